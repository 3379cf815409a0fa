//! Configuration types for qrkdns
//!
//! The binary fills [`SyncConfig`] from flags and environment variables;
//! everything here is plain data plus validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Base domain used when `DOMAIN_NAME` is unset
pub const DEFAULT_DOMAIN_NAME: &str = "qrkdns.net";

/// IP lookup service used when `IP_SERVICE_URL` is unset
pub const DEFAULT_IP_SERVICE_URL: &str = "http://checkip.amazonaws.com";

/// Log level used when `LOG_LEVEL` is unset
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Flag names as the user types them, used in error messages
pub mod flags {
    pub const NETWORK_ID: &str = "network-id";
    pub const DOMAIN: &str = "domain";
    pub const PROVIDER: &str = "provider";
    pub const CLOUDFLARE_ACCOUNT_ID: &str = "cf-account-id";
    pub const CLOUDFLARE_API_TOKEN: &str = "cf-api-token";
    pub const IP_SERVICE_URL: &str = "ip-service-url";
    pub const TIMEOUT: &str = "timeout";
    pub const SCHEDULE: &str = "schedule";
}

/// Supported DNS provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare API v4
    Cloudflare,
}

impl ProviderType {
    /// Every provider qrkdns can talk to
    pub const SUPPORTED: &'static [ProviderType] = &[ProviderType::Cloudflare];

    /// Registry key and CLI value
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Cloudflare => "cloudflare",
        }
    }

    /// Parse a CLI/env value
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) for unknown names.
    pub fn parse(value: &str) -> Result<Self, crate::Error> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| crate::Error::config(format!("unsupported DNS provider: {}", value)))
    }

    /// Comma-separated list for help text
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Account the zone lives in
        account_id: String,
        /// Scoped API token with Zone:DNS:Edit
        api_token: String,
    },
}

impl ProviderConfig {
    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderConfig::Cloudflare { .. } => ProviderType::Cloudflare,
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &'static str {
        self.provider_type().as_str()
    }

    /// Validate the provider configuration
    ///
    /// Every missing credential is listed in one error.
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare {
                account_id,
                api_token,
            } => require_options(
                &format!("using {} provider", ProviderType::Cloudflare),
                &[
                    (flags::CLOUDFLARE_ACCOUNT_ID, account_id),
                    (flags::CLOUDFLARE_API_TOKEN, api_token),
                ],
            ),
        }
    }
}

// API tokens never reach logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Cloudflare { account_id, .. } => f
                .debug_struct("Cloudflare")
                .field("account_id", account_id)
                .field("api_token", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Settings for `qrkdns sync`
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Subdomain identifying this network
    pub network_id: String,
    /// Base domain of the zone
    pub domain: String,
    /// Provider to write through
    pub provider: ProviderConfig,
    /// Plain-text IP lookup service
    pub ip_service_url: String,
    /// End-to-end bound for one pass
    pub timeout: Option<Duration>,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        require_options(
            "syncing",
            &[
                (flags::NETWORK_ID, &self.network_id),
                (flags::DOMAIN, &self.domain),
                (flags::IP_SERVICE_URL, &self.ip_service_url),
            ],
        )?;

        if self.network_id.contains('.') || self.network_id.contains(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "--{} must be a single DNS label, got '{}'",
                flags::NETWORK_ID,
                self.network_id
            )));
        }

        if !self.ip_service_url.starts_with("http://") && !self.ip_service_url.starts_with("https://")
        {
            return Err(crate::Error::config(format!(
                "--{} must use HTTP or HTTPS scheme. Got: {}",
                flags::IP_SERVICE_URL,
                self.ip_service_url
            )));
        }

        self.provider.validate()
    }
}

/// Parse a timeout flag; empty means no timeout
///
/// Accepts human durations such as `5s`, `250ms` or `1m30s`.
pub fn parse_timeout(value: &str) -> Result<Option<Duration>, crate::Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let timeout = humantime::parse_duration(value).map_err(|e| {
        crate::Error::config(format!("invalid --{} '{}': {}", flags::TIMEOUT, value, e))
    })?;

    if timeout.is_zero() {
        return Err(crate::Error::config(format!(
            "--{} must be greater than zero",
            flags::TIMEOUT
        )));
    }

    Ok(Some(timeout))
}

/// Fail with every empty option named in one message
fn require_options(when: &str, options: &[(&str, &String)]) -> Result<(), crate::Error> {
    let missing: Vec<String> = options
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| format!("--{}", name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(crate::Error::config(format!(
        "options [{}] are required when {}",
        missing.join(", "),
        when
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloudflare(account_id: &str, api_token: &str) -> ProviderConfig {
        ProviderConfig::Cloudflare {
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        }
    }

    fn sync_config() -> SyncConfig {
        SyncConfig {
            network_id: "bar".to_string(),
            domain: DEFAULT_DOMAIN_NAME.to_string(),
            provider: cloudflare("account", "token"),
            ip_service_url: DEFAULT_IP_SERVICE_URL.to_string(),
            timeout: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(sync_config().validate().is_ok());
    }

    #[test]
    fn test_missing_cloudflare_credentials_are_listed() {
        let err = cloudflare("", "").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: options [--cf-account-id, --cf-api-token] are required when using cloudflare provider"
        );

        let err = cloudflare("account", "").validate().unwrap_err();
        assert!(err.to_string().contains("options [--cf-api-token] are required"));
    }

    #[test]
    fn test_missing_network_id() {
        let mut config = sync_config();
        config.network_id = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[--network-id]"));
    }

    #[test]
    fn test_network_id_must_be_a_label() {
        let mut config = sync_config();
        config.network_id = "a.b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ip_service_url_scheme() {
        let mut config = sync_config();
        config.ip_service_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_type_parse() {
        assert_eq!(ProviderType::parse("cloudflare").unwrap(), ProviderType::Cloudflare);
        assert_eq!(ProviderType::parse("Cloudflare").unwrap(), ProviderType::Cloudflare);

        let err = ProviderType::parse("route53").unwrap_err();
        assert!(err.to_string().contains("unsupported DNS provider: route53"));
        assert_eq!(ProviderType::supported_list(), "cloudflare");
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("").unwrap(), None);
        assert_eq!(parse_timeout("5s").unwrap(), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("1m30s").unwrap(), Some(Duration::from_secs(90)));
        assert!(matches!(parse_timeout("soon"), Err(crate::Error::Config(_))));
        assert!(parse_timeout("0s").is_err());
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let debug_str = format!("{:?}", cloudflare("account", "secret_token_12345"));
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("account"));
    }
}
