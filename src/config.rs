use std::time::Duration;

use crate::error::{Error, Result};



pub const WORKERS: usize = 20;
pub const DEADLINE: Duration = Duration::from_secs(1);
pub const ITEM_DELAY: Duration = Duration::from_millis(1);

/// Capacity of the generator -> workers and worker -> collector channels.
/// tokio mpsc cannot be zero-sized, one slot is the closest to a handshake.
pub const HANDSHAKE_CAPACITY: usize = 1;



/// Knobs of a single pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {

    /// number of relay workers, fixed for the run
    pub workers: usize,

    /// generator is cancelled once this elapses
    pub deadline: Duration,

    /// pause each worker takes after forwarding one value
    pub item_delay: Duration,

    /// capacity of the merged channel, `None` means one slot per worker
    pub merge_buffer: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            workers: WORKERS,
            deadline: DEADLINE,
            item_delay: ITEM_DELAY,
            merge_buffer: None,
        }
    }
}

impl PipelineConfig {

    pub fn new(workers: usize, deadline: Duration, item_delay: Duration) -> Self {
        PipelineConfig {
            workers,
            deadline,
            item_delay,
            merge_buffer: None,
        }
    }

    pub fn with_merge_buffer(mut self, size: usize) -> Self {
        self.merge_buffer = Some(size);
        self
    }

    #[inline]
    pub fn merge_capacity(&self) -> usize {
        self.merge_buffer.unwrap_or(self.workers)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "worker pool needs at least one worker".to_owned(),
            });
        }

        if self.merge_capacity() == 0 {
            return Err(Error::InvalidConfig {
                reason: "merged channel capacity must be positive".to_owned(),
            });
        }

        Ok(())
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.workers, 20);
        assert_eq!(cfg.merge_capacity(), 20);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = PipelineConfig::new(0, DEADLINE, ITEM_DELAY);
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn zero_merge_buffer_rejected() {
        let cfg = PipelineConfig::new(4, DEADLINE, ITEM_DELAY).with_merge_buffer(0);
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig { .. })));
    }
}
