mod active_pointer;
mod blob_backend;
mod hosts_file;
mod wallpaper_applier;

pub use active_pointer::{ActivePointer, PointerError};
pub use blob_backend::{BackendError, BlobBackend};
pub use hosts_file::{HostsError, HostsFile};
pub use wallpaper_applier::{ApplyError, WallpaperApplier};

#[cfg(test)]
pub use active_pointer::MockActivePointer;
#[cfg(test)]
pub use blob_backend::MockBlobBackend;
#[cfg(test)]
pub use hosts_file::MockHostsFile;
#[cfg(test)]
pub use wallpaper_applier::MockWallpaperApplier;
