//! Zone-scoped provider client
//!
//! [`ZoneClient`] binds a [`DnsProvider`] to one base domain. It resolves
//! the zone id on first use, caches it for its own lifetime, and exposes
//! the record operations without a zone argument.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::Result;
use crate::record::{Record, RecordFilter, fqdn};
use crate::traits::DnsProvider;

/// A [`DnsProvider`] bound to one zone
pub struct ZoneClient {
    provider: Arc<dyn DnsProvider>,
    domain: String,
    /// Resolved at most once; read-only afterwards
    zone_id: OnceCell<String>,
}

impl ZoneClient {
    /// Create a client for `domain`; the zone id is resolved lazily
    pub fn new(provider: Arc<dyn DnsProvider>, domain: impl Into<String>) -> Self {
        Self {
            provider,
            domain: domain.into(),
            zone_id: OnceCell::new(),
        }
    }

    /// Base domain of the zone
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Fully-qualified name of `subdomain` in this zone
    pub fn fqdn(&self, subdomain: &str) -> String {
        fqdn(subdomain, &self.domain)
    }

    /// Zone id, resolving it on first call
    ///
    /// A failed lookup is not cached; the next call asks the provider again.
    pub async fn zone_id(&self) -> Result<&str> {
        let zone_id = self
            .zone_id
            .get_or_try_init(|| async {
                debug!(domain = %self.domain, "Resolving zone ID");
                self.provider
                    .resolve_zone_id(&self.domain)
                    .await
                    .map_err(|e| e.context(&format!("resolve zone {}", self.domain)))
            })
            .await?;
        Ok(zone_id.as_str())
    }

    /// List A records named `<subdomain>.<domain>`
    pub async fn list_a_records(&self, subdomain: &str) -> Result<Vec<Record>> {
        let zone_id = self.zone_id().await?;
        let filter = RecordFilter::a(self.fqdn(subdomain));
        self.provider
            .list_records(zone_id, &filter)
            .await
            .map_err(|e| e.context(&format!("list records {}", filter.name)))
    }

    /// Fetch a record by id
    pub async fn get_record(&self, record_id: &str) -> Result<Record> {
        let zone_id = self.zone_id().await?;
        self.provider
            .get_record(zone_id, record_id)
            .await
            .map_err(|e| e.context(&format!("get record {}", record_id)))
    }

    /// Create a record
    pub async fn create_record(&self, record: &Record) -> Result<Record> {
        let zone_id = self.zone_id().await?;
        self.provider
            .create_record(zone_id, record)
            .await
            .map_err(|e| e.context(&format!("create record {}", record.name)))
    }

    /// Overwrite a record by id
    pub async fn update_record(&self, record_id: &str, record: &Record) -> Result<()> {
        let zone_id = self.zone_id().await?;
        self.provider
            .update_record(zone_id, record_id, record)
            .await
            .map_err(|e| e.context(&format!("update record {}", record_id)))
    }

    /// Delete a record by id
    pub async fn delete_record(&self, record_id: &str) -> Result<()> {
        let zone_id = self.zone_id().await?;
        self.provider
            .delete_record(zone_id, record_id)
            .await
            .map_err(|e| e.context(&format!("delete record {}", record_id)))
    }
}

impl std::fmt::Debug for ZoneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneClient")
            .field("provider", &self.provider.provider_name())
            .field("domain", &self.domain)
            .field("zone_id", &self.zone_id.get())
            .finish()
    }
}
