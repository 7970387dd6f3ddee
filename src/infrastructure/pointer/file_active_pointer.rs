use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::application::ports::{ActivePointer, PointerError};
use crate::domain::value_objects::BlobId;

pub const POINTER_FILE_NAME: &str = "active_wallpaper.json";

#[derive(Debug, Serialize, Deserialize)]
struct PointerDocument {
    id: BlobId,
    set_at: DateTime<Utc>,
}

/// Active pointer kept as a small JSON document in the agent state directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader sees either the old or the new pointer.
pub struct FileActivePointer {
    path: PathBuf,
}

impl FileActivePointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Pointer file inside `state_dir`
    pub fn in_dir(state_dir: impl AsRef<Path>) -> Self {
        Self::new(state_dir.as_ref().join(POINTER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ActivePointer for FileActivePointer {
    async fn get(&self) -> Result<Option<BlobId>, PointerError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let doc: PointerDocument = serde_json::from_slice(&raw)
            .map_err(|e| PointerError::Corrupt(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(doc.id))
    }

    async fn set(&self, id: BlobId) -> Result<(), PointerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let doc = PointerDocument {
            id,
            set_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&doc)
            .map_err(|e| PointerError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(%id, path = %self.path.display(), "Active pointer updated");
        Ok(())
    }
}
