use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the collection loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Maximum number of items to collect (default: 1000)
    pub target: usize,

    /// Consecutive non-progressing iterations before giving up (default: 3)
    pub max_retries: u32,

    /// New items per iteration below which progress counts as weak (default: 5)
    pub low_watermark: usize,

    /// Pause after an iteration that emitted something, in milliseconds (default: 1200)
    pub progress_delay_ms: u64,

    /// Pause after an iteration that emitted nothing, in milliseconds (default: 2000)
    pub stall_delay_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            target: 1000,
            max_retries: 3,
            low_watermark: 5,
            progress_delay_ms: 1200,
            stall_delay_ms: 2000,
        }
    }
}

impl CollectorConfig {
    pub fn progress_delay(&self) -> Duration {
        Duration::from_millis(self.progress_delay_ms)
    }

    pub fn stall_delay(&self) -> Duration {
        Duration::from_millis(self.stall_delay_ms)
    }

    /// Pause before the next iteration given how many items this one emitted.
    pub fn delay_after(&self, new_added: usize) -> Duration {
        if new_added == 0 {
            self.stall_delay()
        } else {
            self.progress_delay()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("collector.max_retries must be at least 1".to_string());
        }
        if self.low_watermark == 0 {
            return Err("collector.low_watermark must be at least 1".to_string());
        }
        Ok(())
    }
}
