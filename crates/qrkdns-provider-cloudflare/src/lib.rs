// # Cloudflare DNS Provider
//
// Implements `DnsProvider` on top of the Cloudflare API v4.
//
// ## Behaviour
//
// - One HTTP request per trait call, no retries and no caching
// - Zone lookups are scoped to the configured account
// - Record listing follows pagination until the last page
// - Errors are mapped by HTTP status first, then by the response envelope
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - An empty token is rejected when the provider is built
//
// ## API Reference
//
// - List Zones: GET `/zones?name=...&account.id=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=...&name=...`
// - DNS Record Details: GET `/zones/:zone_id/dns_records/:record_id`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Overwrite DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use qrkdns_core::config::ProviderConfig;
use qrkdns_core::traits::{DnsProvider, DnsProviderFactory};
use qrkdns_core::{Error, ProviderRegistry, Record, RecordFilter, RecordType, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per page when listing
const LIST_PAGE_SIZE: u32 = 100;

const PROVIDER: &str = "cloudflare";

/// Response envelope shared by every v4 endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    page: u32,
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Deleted {
    id: String,
}

/// DNS record as returned by the API; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct DnsRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    name: String,
    content: String,
    ttl: u32,
    #[serde(default)]
    proxied: bool,
}

impl From<DnsRecord> for Record {
    fn from(r: DnsRecord) -> Self {
        Record {
            id: r.id,
            record_type: r.record_type,
            name: r.name,
            content: r.content,
            ttl: r.ttl,
            proxied: r.proxied,
        }
    }
}

/// Body for create and overwrite calls
#[derive(Debug, Serialize)]
struct RecordBody<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    ttl: u32,
    proxied: bool,
}

impl<'a> From<&'a Record> for RecordBody<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            record_type: r.record_type.as_str(),
            name: &r.name,
            content: &r.content,
            ttl: r.ttl,
            proxied: r.proxied,
        }
    }
}

impl<T> Envelope<T> {
    /// Joined `errors[]` messages, or `fallback` when there are none
    fn describe_errors(&self, fallback: &str) -> String {
        if self.errors.is_empty() {
            return fallback.to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn into_result(self, what: &str) -> Result<T> {
        if !self.success {
            let detail = self.describe_errors("request was not successful");
            return Err(Error::provider(PROVIDER, format!("{} failed: {}", what, detail)));
        }
        self.result.ok_or_else(|| {
            Error::provider(PROVIDER, format!("{} failed: response has no result", what))
        })
    }
}

/// Cloudflare DNS provider
///
/// Stateless apart from the HTTP client. The zone id is cached by the
/// caller, not here.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Account the zones are looked up in
    account_id: String,

    /// API root, overridable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `account_id`: Account whose zones are searched
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is empty or the HTTP
    /// client cannot be built.
    pub fn new(api_token: impl Into<String>, account_id: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            account_id: account_id.into(),
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Point the provider at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/{}", self.records_url(zone_id), record_id)
    }

    /// Send an authenticated request and decode the envelope
    ///
    /// `what` names the operation in error messages.
    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Envelope<T>> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .map(|env| env.describe_errors(body.trim()))
                .unwrap_or_else(|_| body.trim().to_string());

            // Map HTTP status codes to specific errors
            let message = match status.as_u16() {
                401 | 403 => format!(
                    "Authentication failed: Invalid API token or insufficient permissions. Status: {} - {}",
                    status, detail
                ),
                404 => format!("{} failed: not found - {}", what, detail),
                429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
                500..=599 => format!(
                    "Cloudflare server error (transient): {} - {}",
                    status, detail
                ),
                _ => format!("{} failed: {} - {}", what, status, detail),
            };
            return Err(Error::provider(PROVIDER, message));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn resolve_zone_id(&self, domain: &str) -> Result<String> {
        debug!(domain, "Looking up zone ID");

        let request = self
            .client
            .get(format!("{}/zones", self.base_url))
            .query(&[("name", domain), ("account.id", self.account_id.as_str())]);
        let zones: Vec<Zone> = self.call(request, "Zone lookup").await?.into_result("Zone lookup")?;

        let zone = zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::provider(PROVIDER, format!("Zone not found: {}", domain)))?;

        debug!(zone_id = %zone.id, "Found zone ID");
        Ok(zone.id)
    }

    async fn list_records(&self, zone_id: &str, filter: &RecordFilter) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = self.client.get(self.records_url(zone_id)).query(&[
                ("type", filter.record_type.as_str().to_string()),
                ("name", filter.name.clone()),
                ("page", page.to_string()),
                ("per_page", LIST_PAGE_SIZE.to_string()),
            ]);
            let envelope = self.call::<Vec<DnsRecord>>(request, "Record lookup").await?;
            let info = envelope
                .result_info
                .as_ref()
                .map(|i| (i.page, i.total_pages));
            let batch = envelope.into_result("Record lookup")?;

            records.extend(batch.into_iter().map(Record::from));

            match info {
                Some((current, total)) if current < total => page = current + 1,
                _ => break,
            }
        }

        debug!(name = %filter.name, count = records.len(), "Listed DNS records");
        Ok(records)
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<Record> {
        let request = self.client.get(self.record_url(zone_id, record_id));
        let record: DnsRecord = self
            .call(request, "Record fetch")
            .await?
            .into_result("Record fetch")?;
        Ok(record.into())
    }

    async fn create_record(&self, zone_id: &str, record: &Record) -> Result<Record> {
        let request = self
            .client
            .post(self.records_url(zone_id))
            .json(&RecordBody::from(record));
        let created: DnsRecord = self
            .call(request, "Record create")
            .await?
            .into_result("Record create")?;

        debug!(record_id = %created.id, name = %created.name, "Created DNS record");
        Ok(created.into())
    }

    async fn update_record(&self, zone_id: &str, record_id: &str, record: &Record) -> Result<()> {
        let request = self
            .client
            .put(self.record_url(zone_id, record_id))
            .json(&RecordBody::from(record));
        self.call::<DnsRecord>(request, "Record update")
            .await?
            .into_result("Record update")?;

        debug!(record_id, "Updated DNS record");
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let request = self.client.delete(self.record_url(zone_id, record_id));
        let deleted: Deleted = self
            .call(request, "Record delete")
            .await?
            .into_result("Record delete")?;

        debug!(record_id = %deleted.id, "Deleted DNS record");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Cloudflare {
                account_id,
                api_token,
            } => Ok(Box::new(CloudflareProvider::new(
                api_token.clone(),
                account_id.clone(),
            )?)),
        }
    }
}

/// Register the Cloudflare provider with a registry
///
/// # Example
///
/// ```rust
/// use qrkdns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// qrkdns_provider_cloudflare::register(&registry);
/// assert!(registry.has_provider("cloudflare"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(PROVIDER, Box::new(CloudflareFactory));
}
