// # DNS Provider Trait
//
// Defines the zone-scoped record operations a DNS provider API must offer.
//
// ## Implementations
//
// - Cloudflare: `qrkdns-provider-cloudflare` crate
// - Test double: `tests/common/mod.rs` in this crate
//
// ## Usage
//
// ```rust,ignore
// use qrkdns_core::{DnsProvider, RecordFilter};
//
// async fn show(provider: &dyn DnsProvider) -> qrkdns_core::Result<()> {
//     let zone_id = provider.resolve_zone_id("qrkdns.net").await?;
//     for record in provider.list_records(&zone_id, &RecordFilter::a("bar.qrkdns.net")).await? {
//         println!("{} -> {}", record.name, record.content);
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{Record, RecordFilter};

/// Trait for DNS provider implementations
///
/// Each method maps to exactly one remote API call. Providers hold no
/// state between calls: zone-id caching lives in
/// [`ZoneClient`](crate::zone::ZoneClient) and every decision about which
/// call to make lives in [`Reconciler`](crate::reconciler::Reconciler).
///
/// # Errors
///
/// Every failure (transport, authentication, unknown zone, missing record)
/// is reported as [`Error::Provider`](crate::Error::Provider). Providers do
/// not retry; the next scheduled sync is the retry.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the zone id for a base domain
    ///
    /// Fails if the provider does not know the zone.
    async fn resolve_zone_id(&self, domain: &str) -> Result<String, crate::Error>;

    /// List records matching `filter`
    ///
    /// Returns an empty list, not an error, when nothing matches. Order is
    /// whatever the provider returns and is preserved.
    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<Record>, crate::Error>;

    /// Fetch a single record by id
    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<Record, crate::Error>;

    /// Create a record; the returned record carries the new id
    async fn create_record(&self, zone_id: &str, record: &Record) -> Result<Record, crate::Error>;

    /// Overwrite the record `record_id` with the fields of `record`
    ///
    /// Returns nothing: callers needing the stored state must re-fetch.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &Record,
    ) -> Result<(), crate::Error>;

    /// Delete the record `record_id`
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
