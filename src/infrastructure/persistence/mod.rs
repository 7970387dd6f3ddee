mod in_memory_blob_backend;
mod postgres_blob_backend;

pub use in_memory_blob_backend::InMemoryBlobBackend;
pub use postgres_blob_backend::PostgresBlobBackend;
