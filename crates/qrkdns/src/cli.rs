//! Command-line interface
//!
//! Every flag falls back to an environment variable, so the same binary can
//! be driven from a shell, a systemd unit or a container.

use clap::{Args, Parser, Subcommand, ValueEnum};
use qrkdns_core::config::{
    DEFAULT_DOMAIN_NAME, DEFAULT_IP_SERVICE_URL, DEFAULT_LOG_LEVEL, parse_timeout,
};
use qrkdns_core::{ProviderConfig, ProviderType, SyncConfig};

/// Keep a DNS A record pointed at this network's external IP
#[derive(Parser)]
#[command(name = "qrkdns", version, about)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL, global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Point <network-id>.<domain> at the current external IP
    #[command(visible_alias = "s")]
    Sync(SyncArgs),
}

#[derive(Args)]
pub struct SyncArgs {
    /// Subdomain identifying this network
    #[arg(short = 'n', long, env = "NETWORK_ID", default_value = "", global = true)]
    pub network_id: String,

    /// Base domain the zone is registered under
    #[arg(short = 'd', long, env = "DOMAIN_NAME", default_value = DEFAULT_DOMAIN_NAME, global = true)]
    pub domain: String,

    /// DNS provider
    #[arg(
        short = 'p',
        long,
        env = "PROVIDER",
        default_value = "cloudflare",
        long_help = format!("DNS provider. Supported: {}", ProviderType::supported_list()),
        global = true
    )]
    pub provider: String,

    /// Cloudflare account id
    #[arg(short = 'a', long, env = "CLOUDFLARE_ACCOUNT_ID", default_value = "", global = true)]
    pub cf_account_id: String,

    /// Cloudflare API token
    #[arg(
        short = 't',
        long,
        env = "CLOUDFLARE_API_TOKEN",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub cf_api_token: String,

    /// Service answering GET with the caller's IP as plain text
    #[arg(short = 'i', long, env = "IP_SERVICE_URL", default_value = DEFAULT_IP_SERVICE_URL, global = true)]
    pub ip_service_url: String,

    /// Deadline for one sync pass, e.g. 30s or 1m30s; unset means none
    #[arg(long, env = "TIMEOUT", default_value = "", global = true)]
    pub timeout: String,

    #[command(subcommand)]
    pub mode: Option<SyncMode>,
}

#[derive(Subcommand)]
pub enum SyncMode {
    /// Run sync on a cron schedule until interrupted
    Cron {
        /// Cron expression, 5-field or with a leading seconds field
        #[arg(long, env = "SCHEDULE")]
        schedule: String,
    },
}

impl SyncArgs {
    /// Build and validate the sync settings
    pub fn to_config(&self) -> qrkdns_core::Result<SyncConfig> {
        let provider = match ProviderType::parse(&self.provider)? {
            ProviderType::Cloudflare => ProviderConfig::Cloudflare {
                account_id: self.cf_account_id.trim().to_string(),
                api_token: self.cf_api_token.trim().to_string(),
            },
        };

        let config = SyncConfig {
            network_id: self.network_id.trim().to_string(),
            domain: self.domain.trim().to_string(),
            provider,
            ip_service_url: self.ip_service_url.trim().to_string(),
            timeout: parse_timeout(&self.timeout)?,
        };
        config.validate()?;
        Ok(config)
    }
}
