use std::sync::Arc;

use tracing::info;

use crate::application::dto::{PutOutcome, Upload};
use crate::application::errors::ActivateError;
use crate::application::ports::WallpaperApplier;
use crate::application::use_cases::{ContentStore, UsageTracker};
use crate::domain::value_objects::{BlobId, WallpaperStyle};

/// Use case: store an image and put it on the desktop
pub struct ActivateWallpaper {
    store: Arc<ContentStore>,
    tracker: Arc<UsageTracker>,
    applier: Arc<dyn WallpaperApplier>,
}

impl ActivateWallpaper {
    pub fn new(
        store: Arc<ContentStore>,
        tracker: Arc<UsageTracker>,
        applier: Arc<dyn WallpaperApplier>,
    ) -> Self {
        Self {
            store,
            tracker,
            applier,
        }
    }

    /// Store (dedup), apply, then record usage and the active pointer.
    /// Usage is only recorded once the applier succeeded.
    pub async fn execute(
        &self,
        upload: Upload,
        style: WallpaperStyle,
    ) -> Result<PutOutcome, ActivateError> {
        let data = upload.data.clone();
        let outcome = self.store.put(upload).await?;

        self.applier.apply(data, style).await?;
        self.record_activation(outcome.id, style).await;

        Ok(outcome)
    }

    /// Re-apply a blob that is already stored
    pub async fn reapply(&self, id: &BlobId, style: WallpaperStyle) -> Result<(), ActivateError> {
        let content = self.store.get(id).await?;

        self.applier.apply(content.data, style).await?;
        self.record_activation(*id, style).await;

        Ok(())
    }

    async fn record_activation(&self, id: BlobId, style: WallpaperStyle) {
        self.tracker.mark_used(&id).await;
        self.tracker.set_current(id).await;
        info!(%id, %style, "Wallpaper activated");
    }
}
