use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::ports::{HostsError, HostsFile};
use crate::domain::hosts::HostsDocument;
use crate::domain::value_objects::normalize_domains;

/// Keeps the hosts file in line with the desired blocklist.
///
/// The file itself is the only state. Every operation is one
/// read-modify-write, serialized through `lock` within this process.
pub struct HostsReconciler {
    file: Arc<dyn HostsFile>,
    redirect_ip: Ipv4Addr,
    lock: Mutex<()>,
}

impl HostsReconciler {
    pub fn new(file: Arc<dyn HostsFile>, redirect_ip: Ipv4Addr) -> Self {
        Self {
            file,
            redirect_ip,
            lock: Mutex::new(()),
        }
    }

    pub fn redirect_ip(&self) -> Ipv4Addr {
        self.redirect_ip
    }

    /// Bind each domain to the redirect ip. Returns how many lines were added.
    pub async fn block<S: AsRef<str>>(&self, domains: &[S]) -> Result<usize, HostsError> {
        let domains = normalize_domains(domains)?;
        if domains.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock.lock().await;
        let content = self.file.read().await?.unwrap_or_default();
        let plan = HostsDocument::new(&content).plan_block(self.redirect_ip, &domains);

        if plan.is_empty() {
            debug!(requested = domains.len(), "All domains already blocked");
            return Ok(0);
        }

        self.file.append(&plan.append).await?;
        info!(
            added = plan.added.len(),
            ip = %self.redirect_ip,
            "Blocked domains in hosts file"
        );
        Ok(plan.added.len())
    }

    /// Remove every line mentioning one of the domains. Returns how many
    /// lines were removed.
    pub async fn unblock<S: AsRef<str>>(&self, domains: &[S]) -> Result<usize, HostsError> {
        let domains = normalize_domains(domains)?;
        if domains.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock.lock().await;
        let Some(content) = self.file.read().await? else {
            return Ok(0);
        };
        let plan = HostsDocument::new(&content).plan_unblock(&domains);

        if plan.removed == 0 {
            debug!(requested = domains.len(), "No matching hosts lines");
            return Ok(0);
        }

        self.file.replace(&plan.content).await?;
        info!(removed = plan.removed, "Unblocked domains in hosts file");
        Ok(plan.removed)
    }

    /// Hosts currently bound to the redirect ip
    pub async fn list(&self) -> Result<Vec<String>, HostsError> {
        let _guard = self.lock.lock().await;
        let content = self.file.read().await?.unwrap_or_default();
        Ok(HostsDocument::new(&content).hosts_bound_to(self.redirect_ip))
    }
}
