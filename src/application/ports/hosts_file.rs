use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum HostsError {
    /// Caller should re-run with elevated rights
    #[error("Permission denied on {}; run the agent as administrator/root", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HostsError {
    /// Classify an I/O failure on `path`
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Raw access to the hosts file
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HostsFile: Send + Sync {
    /// Current content, `None` when the file does not exist
    async fn read(&self) -> Result<Option<String>, HostsError>;

    async fn append(&self, text: &str) -> Result<(), HostsError>;

    async fn replace(&self, content: &str) -> Result<(), HostsError>;
}
