use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// When a periodic task fires: once after `initial_delay`, then every `interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl Schedule {
    pub fn new(initial_delay: Duration, interval: Duration) -> Self {
        Self {
            initial_delay,
            // tokio rejects a zero period
            interval: interval.max(Duration::from_millis(1)),
        }
    }
}

/// Runner for periodic tasks with error logging and cooperative shutdown
pub struct PeriodicTaskRunner<T> {
    task: Arc<T>,
    schedule: Schedule,
    task_name: String,
}

impl<T> PeriodicTaskRunner<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(task: Arc<T>, schedule: Schedule, task_name: impl Into<String>) -> Self {
        Self {
            task,
            schedule,
            task_name: task_name.into(),
        }
    }

    /// Run until `shutdown` is cancelled. A run in progress is finished
    /// before the loop notices the cancellation.
    pub async fn run<F, Fut>(&self, task_fn: F, shutdown: CancellationToken)
    where
        F: Fn(Arc<T>) -> Fut,
        Fut: Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>>,
    {
        info!(
            task = %self.task_name,
            initial_delay = ?self.schedule.initial_delay,
            interval = ?self.schedule.interval,
            "Starting periodic task"
        );

        let start = Instant::now() + self.schedule.initial_delay;
        let mut timer = time::interval_at(start, self.schedule.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(task = %self.task_name, "Periodic task stopped");
                    break;
                }
                _ = timer.tick() => {
                    if let Err(e) = task_fn(Arc::clone(&self.task)).await {
                        error!(task = %self.task_name, error = %e, "Periodic task failed");
                    }
                }
            }
        }
    }
}
