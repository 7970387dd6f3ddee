/// Result of one retention sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Candidate records returned by the backend
    pub scanned: usize,
    /// Records removed by this sweep
    pub deleted: usize,
    /// Records that were already removed when the delete ran
    pub already_gone: usize,
    /// Candidates skipped because they are the active wallpaper
    pub protected: usize,
    /// Failures of individual records or pages. The sweep continues past them.
    pub errors: Vec<String>,
}

impl SweepReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Counts already-gone records too: either way the record is no longer stored
    pub fn has_deletions(&self) -> bool {
        self.deleted + self.already_gone > 0
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn summary(&self) -> String {
        let counts = format!(
            "{} scanned, {} deleted, {} already gone, {} protected",
            self.scanned, self.deleted, self.already_gone, self.protected
        );
        if self.errors.is_empty() {
            format!("Retention sweep completed: {}", counts)
        } else {
            format!(
                "Retention sweep completed with {} errors: {}",
                self.errors.len(),
                counts
            )
        }
    }
}

/// Totals over the lifetime of a sweeper
#[derive(Debug, Clone, Default)]
pub struct SweepStatistics {
    pub cycles_completed: usize,
    /// Runs skipped because a sweep was already in progress
    pub cycles_skipped: usize,
    /// Runs aborted before deleting anything
    pub cycles_failed: usize,
    pub total_deleted: usize,
    pub total_errors: usize,
    pub average_deletions_per_cycle: f64,
}

impl SweepStatistics {
    pub fn update(&mut self, report: &SweepReport) {
        self.cycles_completed += 1;
        self.total_deleted += report.deleted;
        self.total_errors += report.errors.len();
        self.average_deletions_per_cycle =
            self.total_deleted as f64 / self.cycles_completed as f64;
    }

    pub fn record_skipped(&mut self) {
        self.cycles_skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.cycles_failed += 1;
    }

    pub fn summary(&self) -> String {
        format!(
            "Retention statistics:\n\
             Cycles completed: {}\n\
             Cycles skipped: {}\n\
             Cycles failed: {}\n\
             Total deleted: {}\n\
             Total errors: {}\n\
             Average deletions/cycle: {:.2}",
            self.cycles_completed,
            self.cycles_skipped,
            self.cycles_failed,
            self.total_deleted,
            self.total_errors,
            self.average_deletions_per_cycle
        )
    }
}
