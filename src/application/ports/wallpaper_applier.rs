use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::domain::value_objects::WallpaperStyle;

#[derive(Debug, Error)]
#[error("Failed to apply wallpaper: {0}")]
pub struct ApplyError(pub String);

/// Paints the desktop. Platform specific, provided by the host application.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WallpaperApplier: Send + Sync {
    async fn apply(&self, data: Bytes, style: WallpaperStyle) -> Result<(), ApplyError>;
}
