//! # Wallpaper Agent - Content-Addressed Wallpaper Store and Hosts Blocklist
//!
//! Core of a desktop agent that stores wallpaper images once per distinct
//! content, tracks which ones are used, sweeps out the ones nobody used for a
//! while, and keeps a domain blocklist in the system hosts file.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Value objects, the blob record, the hosts-file line model
//! - **Application**: Use cases, ports (interfaces) and the retention sweeper
//! - **Infrastructure**: PostgreSQL and in-memory blob backends, active
//!   pointer storage, filesystem hosts file
//!
//! ## Key Features
//!
//! - SHA-256 dedup enforced by a unique rule in the backend
//! - Last-used tracking and protection of the wallpaper on screen
//! - Periodic retention sweeps with bounded delete concurrency
//! - Idempotent hosts-file block/unblock with minimal edits
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallpaper_agent::{dto::Upload, infrastructure::persistence::InMemoryBlobBackend};
//! use wallpaper_agent::use_cases::ContentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ContentStore::new(Arc::new(InMemoryBlobBackend::new()));
//! let outcome = store.put(Upload::new(&b"jpeg bytes"[..])).await?;
//! let content = store.get(&outcome.id).await?;
//! assert_eq!(&content.data[..], b"jpeg bytes");
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use application::{dto, ports, retention, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
