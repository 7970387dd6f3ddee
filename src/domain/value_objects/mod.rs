mod blob_id;
mod content_hash;
mod domain_name;
mod wallpaper_style;

pub use blob_id::BlobId;
pub use content_hash::ContentHash;
pub use domain_name::{normalize_domains, DomainName};
pub use wallpaper_style::WallpaperStyle;
