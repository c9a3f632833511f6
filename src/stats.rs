use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use crate::dispatcher::StageName;



/// Counters fed by the generator's observer callback.
///
/// Writes are atomic fetch-adds from the producing task. `snapshot` is
/// only meaningful once that task has been joined, the join is what makes
/// every write visible to the reader.
#[derive(Debug, Default)]
pub struct GeneratorStats {
    count: AtomicU64,
    sum: AtomicI64,
}

impl GeneratorStats {

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn observe(&self, value: i64) {
        self.sum.fetch_add(value, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Observed {
        Observed {
            count: self.count.load(Ordering::Relaxed),
            sum: self.sum.load(Ordering::Relaxed),
        }
    }
}


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observed {
    pub count: u64,
    pub sum: i64,
}



/// What one fan-in drain loop saw on its worker's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerTally {
    pub stage: StageName,
    pub count: u64,
    pub sum: i64,

    /// false once a value arrived that was not greater than its predecessor
    pub in_order: bool,

    last: Option<i64>,
}

impl WorkerTally {

    pub fn new(stage: StageName) -> Self {
        WorkerTally {
            stage,
            count: 0,
            sum: 0,
            in_order: true,
            last: None,
        }
    }

    #[inline]
    pub fn record(&mut self, value: i64) {
        if let Some(last) = self.last {
            if value <= last {
                self.in_order = false;
            }
        }
        self.last = Some(value);
        self.count += 1;
        self.sum += value;
    }
}



/// Final statistics of one run
#[derive(Debug, Clone)]
pub struct Report {
    pub collected_count: u64,
    pub collected_sum: i64,
    pub observed: Observed,
    pub workers: Vec<WorkerTally>,
}

impl Report {

    pub fn worker_counts(&self) -> Vec<u64> {
        self.workers.iter().map(|w| w.count).collect()
    }
}
