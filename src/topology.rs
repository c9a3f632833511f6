use std::{sync::Arc, time::Duration};

use indexmap::IndexMap;
use futures::future::join_all;
use tokio::{sync::mpsc::{self, channel}, task::JoinHandle};

use crate::{
    builtin::{Counter, Relay},
    collector::merge,
    config::{PipelineConfig, HANDSHAKE_CAPACITY},
    dispatcher::{SharedInput, StageName},
    error::{Error, Result},
    processor::{self, Processor},
    producer,
    shutdown_manager::start_shutdown_manager,
    stats::{GeneratorStats, Report},
    verifier,
};



/// Workers of one stage: their outputs keyed by stage name in spawn order,
/// and the task handles that resolve once each worker fully terminated.
pub struct WorkerPool<Output> {
    pub outputs: IndexMap<StageName, mpsc::Receiver<Output>>,
    pub workers: Vec<JoinHandle<u64>>
}


/// Starts `concurrency` workers built by `processor_factory`, all competing
/// on `input`.
pub fn start_processor<Input, Output, Proc, F>(processor_factory: F,
                                               input: SharedInput<Input>,
                                               concurrency: usize,
                                               item_delay: Duration) -> WorkerPool<Output>
where
    Input  : Send + 'static,
    Output : Send + 'static,
    F      : Fn() -> Proc,
    Proc   : Processor<Input, Output> + Send + 'static
{
    let mut outputs = IndexMap::with_capacity(concurrency);
    let mut workers = Vec::with_capacity(concurrency);

    for elem in 0..concurrency {

        let (sender, recv) = channel(HANDSHAKE_CAPACITY);
        let stage = format!("{}", elem);

        let handle = processor::Context::new(stage.clone(),
                                             input.clone(),
                                             sender,
                                             processor_factory(),
                                             item_delay).run();

        outputs.insert(stage, recv);
        workers.push(handle);
    }

    WorkerPool { outputs, workers }
}


/// Fan-out: `workers` relays sharing one input
pub fn spawn_workers<T>(input: SharedInput<T>,
                        workers: usize,
                        item_delay: Duration) -> WorkerPool<T>
where
    T: Send + 'static
{
    start_processor(|| Relay, input, workers, item_delay)
}


/// Waits for every worker to return, resolves to the total forwarded
pub async fn join_workers(workers: Vec<JoinHandle<u64>>) -> Result<u64> {

    let mut forwarded = 0;

    for res in join_all(workers).await {
        forwarded += res.map_err(|source| Error::TaskFailed { stage: "worker", source })?;
    }

    Ok(forwarded)
}



// ------------------------------------------------------------



/// generator -> workers -> collector -> verifier
///
/// Returns once the merged stream has been fully drained, i.e. after the
/// whole closure cascade that starts at the deadline, and every task the
/// run spawned has been joined.
pub async fn run_pipeline(cfg: &PipelineConfig) -> Result<Report> {
    run_pipeline_with(cfg, |_| (), |_| ()).await
}


/// [`run_pipeline`] with taps on both ends: `on_emit` sees every value the
/// generator handed off, `on_collect` every value the verifier took.
pub async fn run_pipeline_with<E, C>(cfg: &PipelineConfig,
                                     mut on_emit: E,
                                     on_collect: C) -> Result<Report>
where
    E: FnMut(i64) + Send + 'static,
    C: FnMut(i64)
{
    cfg.validate()?;

    let stats = Arc::new(GeneratorStats::new());
    let (sender, recv) = channel(HANDSHAKE_CAPACITY);

    let WorkerPool { outputs, workers } = spawn_workers(SharedInput::new(recv), cfg.workers, cfg.item_delay);
    let merged = merge(outputs, cfg.merge_capacity());

    tracing::info!(workers = cfg.workers,
                   deadline = ?cfg.deadline,
                   item_delay = ?cfg.item_delay,
                   "pipeline started");

    let shutdown = start_shutdown_manager(cfg.deadline);

    let observer = Arc::clone(&stats);
    let generator = producer::Context::new(Counter::default(),
                                           sender,
                                           move |v| {
                                               observer.observe(v);
                                               on_emit(v);
                                           },
                                           shutdown.token()).run();

    let res = verifier::verify_with(merged, generator, stats, on_collect).await;

    // releases the deadline timer if the generator stopped on its own
    shutdown.stop().await;

    // outputs are closed by now, workers may still be in `terminate`
    let forwarded = join_workers(workers).await;

    let report = res?;
    let forwarded = forwarded?;
    tracing::debug!(forwarded, "worker pool stopped");
    tracing::info!(count = report.collected_count,
                   sum = report.collected_sum,
                   "pipeline drained, all invariants hold");

    Ok(report)
}



#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn workers_close_outputs_when_input_closes() {
        let (tx, rx) = channel(1);
        let WorkerPool { outputs, workers } = spawn_workers(SharedInput::new(rx), 3, Duration::ZERO);
        assert_eq!(outputs.keys().cloned().collect::<Vec<_>>(), vec!["0", "1", "2"]);

        let readers: Vec<_> = outputs
            .into_iter()
            .map(|(_, mut rx)| tokio::spawn(async move {
                let mut got = vec![];
                while let Some(v) = rx.recv().await {
                    got.push(v);
                }
                got
            }))
            .collect();

        for v in 1..=9_i64 {
            tx.send(v).await.unwrap();
        }
        drop(tx);

        let mut all = vec![];
        for reader in readers {
            let got = reader.await.unwrap();
            assert!(got.windows(2).all(|w| w[0] < w[1]));
            all.extend(got);
        }
        all.sort_unstable();
        assert_eq!(all, (1..=9).collect::<Vec<_>>());

        assert_eq!(join_workers(workers).await.unwrap(), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn invalid_config_spawns_nothing() {
        let cfg = PipelineConfig::new(0, Duration::from_millis(10), Duration::ZERO);
        assert!(run_pipeline(&cfg).await.is_err());
    }
}
