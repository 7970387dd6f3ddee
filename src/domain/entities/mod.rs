mod blob_record;

pub use blob_record::{BlobRecord, StoredBlob, DEFAULT_MIME_TYPE, DEFAULT_ORIGINAL_NAME};
