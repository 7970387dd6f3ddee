//! Shared test fixtures and utilities for the integration tests
//!
//! Everything runs against the in-memory backend and pointer, and hosts
//! files live in temporary directories.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeDelta, Utc};
use parking_lot::Mutex;
use tempfile::TempDir;

use wallpaper_agent::application::ports::{
    ActivePointer, ApplyError, BlobBackend, WallpaperApplier,
};
use wallpaper_agent::application::retention::{RetentionConfig, RetentionSweeper};
use wallpaper_agent::application::use_cases::{ContentStore, UsageTracker};
use wallpaper_agent::domain::entities::{BlobRecord, StoredBlob};
use wallpaper_agent::domain::value_objects::{BlobId, ContentHash, WallpaperStyle};
use wallpaper_agent::infrastructure::persistence::InMemoryBlobBackend;
use wallpaper_agent::infrastructure::pointer::InMemoryActivePointer;

/// Store, tracker and pointer wired over one in-memory backend
pub struct TestEnvironment {
    pub backend: Arc<InMemoryBlobBackend>,
    pub pointer: Arc<InMemoryActivePointer>,
    pub store: Arc<ContentStore>,
    pub tracker: Arc<UsageTracker>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let backend = Arc::new(InMemoryBlobBackend::new());
        let pointer = Arc::new(InMemoryActivePointer::new());
        let store = Arc::new(ContentStore::new(
            Arc::clone(&backend) as Arc<dyn BlobBackend>
        ));
        let tracker = Arc::new(UsageTracker::new(
            Arc::clone(&backend) as Arc<dyn BlobBackend>,
            Arc::clone(&pointer) as Arc<dyn ActivePointer>,
        ));
        Self {
            backend,
            pointer,
            store,
            tracker,
        }
    }

    pub fn sweeper(&self, retention_days: i64) -> RetentionSweeper {
        RetentionSweeper::new(
            Arc::clone(&self.backend) as Arc<dyn BlobBackend>,
            Arc::clone(&self.store),
            Arc::clone(&self.tracker),
            RetentionConfig::new(retention_days),
        )
    }

    /// Insert a record with backdated timestamps, bypassing the store
    pub async fn seed(
        &self,
        content: &[u8],
        created_days_ago: i64,
        used_days_ago: Option<i64>,
    ) -> BlobId {
        let now = Utc::now();
        let record = BlobRecord::reconstruct(
            BlobId::new(),
            ContentHash::of(content),
            content.len() as u64,
            "image/jpeg".to_string(),
            "wallpaper.jpg".to_string(),
            now - TimeDelta::days(created_days_ago),
            used_days_ago.map(|days| now - TimeDelta::days(days)),
        );
        self.backend
            .create(StoredBlob {
                record,
                data: Bytes::copy_from_slice(content),
            })
            .await
            .expect("Failed to seed blob")
    }

    pub async fn exists(&self, id: &BlobId) -> bool {
        self.backend
            .find_by_id(id)
            .await
            .expect("Lookup failed")
            .is_some()
    }
}

/// Applier that records what it was asked to paint
#[derive(Default)]
pub struct RecordingApplier {
    pub applied: Mutex<Vec<(Bytes, WallpaperStyle)>>,
    pub fail: bool,
}

impl RecordingApplier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl WallpaperApplier for RecordingApplier {
    async fn apply(&self, data: Bytes, style: WallpaperStyle) -> Result<(), ApplyError> {
        if self.fail {
            return Err(ApplyError("no desktop session".to_string()));
        }
        self.applied.lock().push((data, style));
        Ok(())
    }
}

/// Temporary hosts file
pub struct HostsFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl HostsFixture {
    pub fn with_content(content: &str) -> Self {
        let fixture = Self::missing();
        std::fs::write(&fixture.path, content).expect("Failed to write hosts file");
        fixture
    }

    /// Directory exists, file does not
    pub fn missing() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("hosts");
        Self { dir, path }
    }

    pub fn content(&self) -> String {
        std::fs::read_to_string(&self.path).expect("Failed to read hosts file")
    }
}
