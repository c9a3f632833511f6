//! Fan-in stage.
//!
//! One drain task per worker output relays onto a single merged channel.
//! The merged sender held by the closer task is the last one to go: it is
//! dropped only after every drain task was joined, so the merged channel
//! can never be closed under a drain that is still sending.

use futures::future::join_all;
use indexmap::IndexMap;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    dispatcher::StageName,
    error::{Error, Result},
    stats::WorkerTally,
};



pub struct Merged {

    /// every value of every worker, in arrival order
    pub recv: mpsc::Receiver<i64>,

    /// resolves to the per-worker tallies once all drains finished
    pub closer: JoinHandle<Result<Vec<WorkerTally>>>,
}



pub fn merge(inputs: IndexMap<StageName, mpsc::Receiver<i64>>, capacity: usize) -> Merged {

    let (sender, recv) = mpsc::channel(capacity.max(1));

    let mut drains = Vec::with_capacity(inputs.len());

    for (stage, input) in inputs {
        drains.push(tokio::spawn(drain(stage, input, sender.clone())));
    }

    let closer = tokio::spawn(async move {

        // join barrier
        let finished = join_all(drains).await;

        // last merged sender, the verifier loop ends after this
        drop(sender);
        tracing::debug!(workers = finished.len(), "all worker outputs drained, merged channel closed");

        let tallies: Result<Vec<WorkerTally>> = finished
            .into_iter()
            .map(|res| res.map_err(|source| Error::TaskFailed { stage: "collector", source }))
            .collect();
        tallies
    });

    Merged { recv, closer }
}



async fn drain(stage: StageName,
               mut input: mpsc::Receiver<i64>,
               merged: mpsc::Sender<i64>) -> WorkerTally
{
    let mut tally = WorkerTally::new(stage);

    while let Some(v) = input.recv().await {

        if merged.send(v).await.is_err() {
            tracing::warn!(stage = %tally.stage, "merged channel dropped by consumer");
            break
        }
        tally.record(v);
    }

    tracing::trace!(stage = %tally.stage, count = tally.count, "drain finished");
    tally
}
