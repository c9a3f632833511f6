/// trait Producer & the cancellable generator loop
mod producer;

/// trait Processor & the relay worker loop
mod processor;


/// deadline-driven cancellation
mod shutdown_manager;


/// wiring of all stages
mod topology;


/// multi-consumer input shared by the worker pool (fan-out)
mod dispatcher;

/// merge of all worker outputs (fan-in)
mod collector;

/// conservation checks over a drained run
mod verifier;


/// generator counters, per-worker tallies & run report
mod stats;

/// run knobs & their defaults
mod config;

/// error & invariant violation types
mod error;


/// tracing subscriber setup for binaries
pub mod telemetry;



pub use async_trait::async_trait;

/// Built-in producer & processor
pub mod builtin;


pub use processor::{relay, Processor, ProcResult};

pub use producer::{generate, generate_with, Producer};

pub use dispatcher::{SharedInput, StageName};

pub use collector::{merge, Merged};

pub use verifier::{check, verify, verify_with};

pub use shutdown_manager::{start_shutdown_manager, ShutdownManager};

pub use stats::{GeneratorStats, Observed, Report, WorkerTally};

pub use error::{Error, Result, Violation};


pub use config::{

    PipelineConfig,

    WORKERS,
    DEADLINE,
    ITEM_DELAY,
    HANDSHAKE_CAPACITY

};


pub use topology::{

    run_pipeline,
    run_pipeline_with,
    spawn_workers,
    start_processor,
    join_workers,

    WorkerPool

};
