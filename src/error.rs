use thiserror::Error;
use tokio::task::JoinError;


pub type Result<T> = core::result::Result<T, Error>;


/// Errors surfaced by a pipeline run
#[derive(Error, Debug)]
pub enum Error {

    /// rejected before any task was spawned
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// pipeline lost, duplicated or miscounted a value
    #[error("Invariant violated: {0}")]
    InvariantViolation(#[from] Violation),

    /// a stage task panicked or was aborted
    #[error("Stage `{stage}` failed: {source}")]
    TaskFailed {
        stage: &'static str,
        #[source]
        source: JoinError,
    },
}


/// Conservation checks performed by the verifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {

    #[error("collected count {collected} != generated count {observed}")]
    CountMismatch { observed: u64, collected: u64 },

    #[error("collected sum {collected} != generated sum {observed}")]
    SumMismatch { observed: i64, collected: i64 },

    #[error("per-worker counts add up to {per_worker}, generated {observed}")]
    WorkerCountMismatch { observed: u64, per_worker: u64 },

    #[error("per-worker sums add up to {per_worker}, generated {observed}")]
    WorkerSumMismatch { observed: i64, per_worker: i64 },

    #[error("worker `{stage}` reordered its stream")]
    WorkerOrder { stage: String },
}
