pub mod config;
pub mod results;
pub mod scheduler;
pub mod sweeper;

pub use config::RetentionConfig;
pub use results::{SweepReport, SweepStatistics};
pub use scheduler::{PeriodicTaskRunner, Schedule};
pub use sweeper::{RetentionSweeper, SweepState};
