use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::application::ports::{BackendError, BlobBackend};
use crate::domain::entities::{BlobRecord, StoredBlob};
use crate::domain::value_objects::{BlobId, ContentHash};

/// Blob backend on a single PostgreSQL table, bytes inline as `BYTEA`.
///
/// Dedup relies on the partial unique index over `content_hash` created by
/// the migrations.
pub struct PostgresBlobBackend {
    pool: PgPool,
}

impl PostgresBlobBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Connection level failures are `Unavailable`, the rest stay database errors
fn classify(err: sqlx::Error) -> BackendError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            BackendError::Unavailable(err.to_string())
        }
        other => BackendError::Database(other),
    }
}

#[async_trait]
impl BlobBackend for PostgresBlobBackend {
    async fn create(&self, blob: StoredBlob) -> Result<BlobId, BackendError> {
        let record = &blob.record;
        let id = record.id();
        let size = i64::try_from(record.size_bytes())
            .map_err(|_| BackendError::Corrupt(format!("size {} out of range", record.size_bytes())))?;

        let result = sqlx::query(
            r#"
            INSERT INTO wallpaper_blobs (
                id, content_hash, size_bytes, mime_type, original_name,
                data, created_at, last_used_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id.as_uuid())
        .bind(record.content_hash().as_hex())
        .bind(size)
        .bind(record.mime_type())
        .bind(record.original_name())
        .bind(blob.data.as_ref())
        .bind(record.created_at())
        .bind(record.last_used_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(BackendError::Conflict(record.content_hash().clone()))
            }
            Err(e) => Err(classify(e)),
        }
    }

    async fn read(&self, id: &BlobId) -> Result<StoredBlob, BackendError> {
        let row = sqlx::query_as::<_, StoredBlobRow>(
            r#"
            SELECT id, content_hash, size_bytes, mime_type, original_name,
                   created_at, last_used_at, data
            FROM wallpaper_blobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or(BackendError::NotFound(*id))?;

        row.into_domain()
    }

    async fn find_by_id(&self, id: &BlobId) -> Result<Option<BlobRecord>, BackendError> {
        let row = sqlx::query_as::<_, BlobRow>(
            r#"
            SELECT id, content_hash, size_bytes, mime_type, original_name,
                   created_at, last_used_at
            FROM wallpaper_blobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        row.map(BlobRow::into_domain).transpose()
    }

    async fn find_by_hash(&self, hash: &ContentHash) -> Result<Option<BlobId>, BackendError> {
        let row = sqlx::query_as::<_, (Uuid,)>(
            "SELECT id FROM wallpaper_blobs WHERE content_hash = $1",
        )
        .bind(hash.as_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(|(id,)| BlobId::from_uuid(id)))
    }

    async fn remove(&self, id: &BlobId) -> Result<(), BackendError> {
        let result = sqlx::query("DELETE FROM wallpaper_blobs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(BackendError::NotFound(*id));
        }
        Ok(())
    }

    async fn touch_last_used(&self, id: &BlobId, at: DateTime<Utc>) -> Result<(), BackendError> {
        // GREATEST skips NULL, so a never-used row takes `at`
        let result = sqlx::query(
            r#"
            UPDATE wallpaper_blobs
            SET last_used_at = GREATEST(last_used_at, $2)
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(BackendError::NotFound(*id));
        }
        Ok(())
    }

    async fn find_retention_candidates(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<BlobId>,
        limit: i64,
    ) -> Result<Vec<BlobRecord>, BackendError> {
        let rows = sqlx::query_as::<_, BlobRow>(
            r#"
            SELECT id, content_hash, size_bytes, mime_type, original_name,
                   created_at, last_used_at
            FROM wallpaper_blobs
            WHERE created_at < $1
              AND (last_used_at IS NULL OR last_used_at < $1)
              AND ($2::uuid IS NULL OR id > $2)
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(cutoff)
        .bind(after.map(|id| *id.as_uuid()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter().map(BlobRow::into_domain).collect()
    }
}

#[derive(sqlx::FromRow)]
struct BlobRow {
    id: Uuid,
    content_hash: String,
    size_bytes: i64,
    mime_type: String,
    original_name: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl BlobRow {
    fn into_domain(self) -> Result<BlobRecord, BackendError> {
        let content_hash = ContentHash::from_hex(self.content_hash)
            .map_err(|e| BackendError::Corrupt(format!("row {}: {}", self.id, e)))?;
        let size_bytes = u64::try_from(self.size_bytes)
            .map_err(|_| BackendError::Corrupt(format!("row {}: negative size", self.id)))?;

        Ok(BlobRecord::reconstruct(
            BlobId::from_uuid(self.id),
            content_hash,
            size_bytes,
            self.mime_type,
            self.original_name,
            self.created_at,
            self.last_used_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct StoredBlobRow {
    #[sqlx(flatten)]
    record: BlobRow,
    data: Vec<u8>,
}

impl StoredBlobRow {
    fn into_domain(self) -> Result<StoredBlob, BackendError> {
        Ok(StoredBlob {
            record: self.record.into_domain()?,
            data: self.data.into(),
        })
    }
}
