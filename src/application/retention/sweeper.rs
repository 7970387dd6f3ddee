use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::errors::{StoreError, SweepError};
use crate::application::ports::BlobBackend;
use crate::application::retention::config::RetentionConfig;
use crate::application::retention::results::{SweepReport, SweepStatistics};
use crate::application::retention::scheduler::{PeriodicTaskRunner, Schedule};
use crate::application::use_cases::{ContentStore, UsageTracker};
use crate::domain::value_objects::BlobId;

/// Where the sweeper is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepState {
    #[default]
    Idle,
    Scanning,
    Deleting,
}

impl fmt::Display for SweepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SweepState::Idle => "idle",
            SweepState::Scanning => "scanning",
            SweepState::Deleting => "deleting",
        };
        f.write_str(name)
    }
}

/// Holds the sweeper out of `Idle` and puts it back on drop, including on
/// early return.
struct ActiveSweep<'a> {
    state: &'a Mutex<SweepState>,
}

impl<'a> ActiveSweep<'a> {
    fn begin(state: &'a Mutex<SweepState>) -> Result<Self, SweepError> {
        let mut current = state.lock();
        if *current != SweepState::Idle {
            return Err(SweepError::AlreadyRunning);
        }
        *current = SweepState::Scanning;
        Ok(Self { state })
    }

    fn enter(&self, next: SweepState) {
        *self.state.lock() = next;
    }
}

impl Drop for ActiveSweep<'_> {
    fn drop(&mut self) {
        *self.state.lock() = SweepState::Idle;
    }
}

/// Removes wallpapers nobody has used within the retention window.
///
/// Candidates come from the backend in id-ordered pages. The active
/// wallpaper is never removed, and a sweep that cannot tell which wallpaper
/// is active removes nothing.
pub struct RetentionSweeper {
    backend: Arc<dyn BlobBackend>,
    store: Arc<ContentStore>,
    tracker: Arc<UsageTracker>,
    config: RetentionConfig,
    state: Mutex<SweepState>,
    statistics: Mutex<SweepStatistics>,
}

impl RetentionSweeper {
    pub fn new(
        backend: Arc<dyn BlobBackend>,
        store: Arc<ContentStore>,
        tracker: Arc<UsageTracker>,
        config: RetentionConfig,
    ) -> Self {
        Self {
            backend,
            store,
            tracker,
            config,
            state: Mutex::new(SweepState::Idle),
            statistics: Mutex::new(SweepStatistics::default()),
        }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    pub fn state(&self) -> SweepState {
        *self.state.lock()
    }

    pub fn statistics(&self) -> SweepStatistics {
        self.statistics.lock().clone()
    }

    /// Sweep on schedule until `shutdown` fires
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let schedule = Schedule::new(self.config.initial_delay, self.config.interval);
        let runner = PeriodicTaskRunner::new(Arc::clone(&self), schedule, "retention_sweep");

        runner
            .run(
                |sweeper| async move { sweeper.scheduled_sweep().await },
                shutdown,
            )
            .await;

        info!("{}", self.statistics().summary());
    }

    async fn scheduled_sweep(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self.sweep_once().await {
            Ok(report) => {
                if report.has_deletions() || !report.is_success() {
                    info!("{}", report.summary());
                } else {
                    debug!("{}", report.summary());
                }
                self.statistics.lock().update(&report);
                Ok(())
            }
            Err(SweepError::AlreadyRunning) => {
                info!("Retention sweep already in progress, skipping this run");
                self.statistics.lock().record_skipped();
                Ok(())
            }
            Err(e) => {
                self.statistics.lock().record_failed();
                Err(e.into())
            }
        }
    }

    /// Run one sweep now.
    ///
    /// Fails with [`SweepError::AlreadyRunning`] if another sweep is in
    /// progress, and with [`SweepError::ActivePointer`] (before deleting
    /// anything) if the active wallpaper cannot be determined. Failures of
    /// single records or pages are collected in the report instead.
    pub async fn sweep_once(&self) -> Result<SweepReport, SweepError> {
        let sweep = ActiveSweep::begin(&self.state)?;

        let current = self.tracker.current_id().await?;
        let cutoff = self.config.cutoff(Utc::now());
        let batch_size = self.config.batch_size.max(1);
        let concurrency = self.config.concurrency.max(1);

        debug!(%cutoff, current = ?current, "Retention sweep started");

        let mut report = SweepReport::new();
        let mut after: Option<BlobId> = None;

        loop {
            let page = match self
                .backend
                .find_retention_candidates(cutoff, after, batch_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    error!(error = %e, "Retention candidate query failed");
                    report.add_error(format!("candidate query failed: {}", e));
                    break;
                }
            };

            let Some(last) = page.last() else {
                break;
            };
            after = Some(last.id());
            let page_len = page.len();
            report.scanned += page_len;

            let mut targets = Vec::with_capacity(page_len);
            for record in &page {
                if Some(record.id()) == current {
                    report.protected += 1;
                } else if record.is_stale(cutoff) {
                    targets.push(record.id());
                }
            }

            if !targets.is_empty() {
                sweep.enter(SweepState::Deleting);
                let results: Vec<(BlobId, Result<(), StoreError>)> = stream::iter(targets)
                    .map(|id| async move { (id, self.store.delete(&id).await) })
                    .buffer_unordered(concurrency)
                    .collect()
                    .await;
                sweep.enter(SweepState::Scanning);

                for (id, result) in results {
                    match result {
                        Ok(()) => report.deleted += 1,
                        Err(StoreError::NotFound(_)) => {
                            debug!(%id, "Blob already gone");
                            report.already_gone += 1;
                        }
                        Err(e) => {
                            warn!(%id, error = %e, "Failed to delete expired blob, skipping");
                            report.add_error(format!("{}: {}", id, e));
                        }
                    }
                }
            }

            if (page_len as i64) < batch_size {
                break;
            }
        }

        Ok(report)
    }
}
