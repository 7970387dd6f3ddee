use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::application::ports::{HostsError, HostsFile};

#[cfg(windows)]
pub const DEFAULT_HOSTS_PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";
#[cfg(not(windows))]
pub const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// The system hosts file on the local filesystem.
///
/// `replace` truncates and rewrites in place, keeping the inode (bind mounts,
/// ACLs).
pub struct FsHostsFile {
    path: PathBuf,
}

impl FsHostsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> HostsError {
        HostsError::from_io(&self.path, source)
    }

    #[cfg(windows)]
    async fn prepare_write(&self) {
        // Windows ships the hosts file read-only on some setups
        let Ok(meta) = fs::metadata(&self.path).await else {
            return;
        };
        let mut perms = meta.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            if let Err(e) = fs::set_permissions(&self.path, perms).await {
                warn!(path = %self.path.display(), error = %e, "Could not clear read-only attribute");
            }
        }
    }

    #[cfg(not(windows))]
    async fn prepare_write(&self) {}
}

impl Default for FsHostsFile {
    fn default() -> Self {
        Self::new(DEFAULT_HOSTS_PATH)
    }
}

#[async_trait]
impl HostsFile for FsHostsFile {
    async fn read(&self) -> Result<Option<String>, HostsError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Hosts file missing, treating as empty");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match String::from_utf8(raw) {
            Ok(content) => Ok(Some(content)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "Hosts file is not valid UTF-8, invalid bytes will be replaced"
                );
                Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
            }
        }
    }

    async fn append(&self, text: &str) -> Result<(), HostsError> {
        self.prepare_write().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        Ok(())
    }

    async fn replace(&self, content: &str) -> Result<(), HostsError> {
        self.prepare_write().await;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        Ok(())
    }
}
