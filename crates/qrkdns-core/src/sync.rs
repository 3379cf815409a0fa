//! One sync pass: look up the external IP, then reconcile.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::reconciler::Reconciler;
use crate::record::Record;
use crate::traits::IpSource;

/// Everything needed to keep one subdomain pointed at this host
///
/// Cheap to clone; clones share the provider client and its cached zone id.
#[derive(Clone)]
pub struct SyncJob {
    ip_source: Arc<dyn IpSource>,
    reconciler: Arc<Reconciler>,
    subdomain: String,
    timeout: Option<Duration>,
}

impl SyncJob {
    /// Create a job for `subdomain`
    pub fn new(
        ip_source: Arc<dyn IpSource>,
        reconciler: Arc<Reconciler>,
        subdomain: impl Into<String>,
    ) -> Self {
        Self {
            ip_source,
            reconciler,
            subdomain: subdomain.into(),
            timeout: None,
        }
    }

    /// Bound each pass end-to-end; `None` means no deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Subdomain this job manages
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// Run a single pass
    ///
    /// When a timeout is set and expires, the in-flight request is dropped
    /// (which aborts it) and [`Error::Timeout`] is returned.
    pub async fn run_once(&self) -> Result<Record> {
        self.bounded(self.sync()).await
    }

    /// Resolve and cache the zone id under the same deadline as a pass
    ///
    /// A failure is not cached; the next pass looks the zone up again.
    pub async fn resolve_zone(&self) -> Result<String> {
        self.bounded(async {
            let zone_id = self.reconciler.client().zone_id().await?;
            Ok(zone_id.to_string())
        })
        .await
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(timeout) => {
                debug!(?timeout, "Setting timeout");
                tokio::time::timeout(timeout, fut)
                    .await
                    .map_err(|_| Error::Timeout(timeout))?
            }
            None => fut.await,
        }
    }

    async fn sync(&self) -> Result<Record> {
        let external_ip = self.ip_source.current().await?;
        debug!(
            external_ip = %external_ip,
            source = self.ip_source.source_name(),
            "External IP address retrieved"
        );

        let record = self.reconciler.apply(&self.subdomain, &external_ip).await?;

        info!(record = %record.name, ip = %record.content, "Sync complete");
        Ok(record)
    }
}

impl std::fmt::Debug for SyncJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncJob")
            .field("ip_source", &self.ip_source.source_name())
            .field("reconciler", &self.reconciler)
            .field("subdomain", &self.subdomain)
            .field("timeout", &self.timeout)
            .finish()
    }
}
