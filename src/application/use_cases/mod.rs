mod activate_wallpaper;
mod content_store;
mod hosts_reconciler;
mod usage_tracker;

pub use activate_wallpaper::ActivateWallpaper;
pub use content_store::{ContentStore, MAX_PUT_ATTEMPTS};
pub use hosts_reconciler::HostsReconciler;
pub use usage_tracker::UsageTracker;
