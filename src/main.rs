use std::time::Duration;

use clap::Parser;
use tokio_relay::{run_pipeline, telemetry::init_telemetry, Error, PipelineConfig, Report};



/// Runs the relay pipeline once and checks that every generated value made
/// it through exactly once.
#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs {

    /// Number of relay workers sharing the generator output.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = tokio_relay::WORKERS)]
    workers: usize,

    /// Milliseconds after which the generator is cancelled.
    ///
    /// Environment variable: `DEADLINE_MS`
    #[arg(long, env = "DEADLINE_MS", default_value_t = 1_000)]
    deadline_ms: u64,

    /// Milliseconds each worker pauses after forwarding a value.
    ///
    /// Environment variable: `ITEM_DELAY_MS`
    #[arg(long, env = "ITEM_DELAY_MS", default_value_t = 1)]
    item_delay_ms: u64,

    /// Capacity of the merged channel, defaults to the worker count.
    ///
    /// Environment variable: `MERGE_BUFFER`
    #[arg(long, env = "MERGE_BUFFER")]
    merge_buffer: Option<usize>,
}


impl TryFrom<CliArgs> for PipelineConfig {
    type Error = Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let cfg = PipelineConfig {
            workers: args.workers,
            deadline: Duration::from_millis(args.deadline_ms),
            item_delay: Duration::from_millis(args.item_delay_ms),
            merge_buffer: args.merge_buffer,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}



#[tokio::main]
async fn main() -> anyhow::Result<()> {

    init_telemetry()?;

    let cfg = PipelineConfig::try_from(CliArgs::parse())?;

    // a violated invariant ends the process with a non-zero status
    let report = run_pipeline(&cfg).await?;
    print_report(&report);

    Ok(())
}


fn print_report(report: &Report) {
    println!("count: generated {} collected {}", report.observed.count, report.collected_count);
    println!("sum:   generated {} collected {}", report.observed.sum, report.collected_sum);
    println!("per worker: {:?}", report.worker_counts());
}
