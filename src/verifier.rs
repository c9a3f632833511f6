use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    collector::Merged,
    error::{Error, Result, Violation},
    stats::{GeneratorStats, Report},
};



/// Drains the merged stream and checks it against what the generator
/// reported having emitted.
pub async fn verify(merged: Merged,
                    generator: JoinHandle<()>,
                    stats: Arc<GeneratorStats>) -> Result<Report>
{
    verify_with(merged, generator, stats, |_| ()).await
}


/// Like [`verify`], calling `on_collect` for every value taken off the
/// merged channel.
pub async fn verify_with<F>(merged: Merged,
                            generator: JoinHandle<()>,
                            stats: Arc<GeneratorStats>,
                            mut on_collect: F) -> Result<Report>
where
    F: FnMut(i64)
{
    let Merged { mut recv, closer } = merged;

    let mut collected_count: u64 = 0;
    let mut collected_sum: i64 = 0;

    while let Some(v) = recv.recv().await {
        collected_count += 1;
        collected_sum += v;
        on_collect(v);
    }

    // merged closed: the whole cascade ran, join both ends before reading
    generator
        .await
        .map_err(|source| Error::TaskFailed { stage: "generator", source })?;

    let workers = closer
        .await
        .map_err(|source| Error::TaskFailed { stage: "collector", source })??;

    let report = Report {
        collected_count,
        collected_sum,
        observed: stats.snapshot(),
        workers,
    };

    if let Err(violation) = check(&report) {
        tracing::error!(%violation, ?report, "pipeline invariant violated");
        return Err(violation.into())
    }

    Ok(report)
}



/// Conservation checks over a finished run
pub fn check(report: &Report) -> core::result::Result<(), Violation> {

    let observed = report.observed;

    if report.collected_count != observed.count {
        return Err(Violation::CountMismatch {
            observed: observed.count,
            collected: report.collected_count,
        })
    }

    if report.collected_sum != observed.sum {
        return Err(Violation::SumMismatch {
            observed: observed.sum,
            collected: report.collected_sum,
        })
    }

    let per_worker: u64 = report.workers.iter().map(|w| w.count).sum();
    if per_worker != observed.count {
        return Err(Violation::WorkerCountMismatch {
            observed: observed.count,
            per_worker,
        })
    }

    let per_worker: i64 = report.workers.iter().map(|w| w.sum).sum();
    if per_worker != observed.sum {
        return Err(Violation::WorkerSumMismatch {
            observed: observed.sum,
            per_worker,
        })
    }

    if let Some(w) = report.workers.iter().find(|w| !w.in_order) {
        return Err(Violation::WorkerOrder { stage: w.stage.clone() })
    }

    Ok(())
}
