use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Configuration for retention sweeps
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Records neither created nor used within this many days are removed
    pub retention_days: i64,
    /// Delay before the first sweep after startup
    pub initial_delay: Duration,
    /// How often to sweep
    pub interval: Duration,
    /// Page size when scanning candidates
    pub batch_size: i64,
    /// Deletions in flight per page
    pub concurrency: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: 30,
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(24 * 60 * 60),
            batch_size: 100,
            concurrency: 4,
        }
    }
}

impl RetentionConfig {
    pub fn new(retention_days: i64) -> Self {
        Self {
            retention_days,
            ..Self::default()
        }
    }

    /// Everything older than the returned instant is eligible.
    ///
    /// Out-of-range windows saturate: a negative one is treated as zero, a
    /// huge one reaches back to the earliest representable instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = TimeDelta::try_days(self.retention_days.max(0)).unwrap_or(TimeDelta::MAX);
        now.checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
