//! DNS record model
//!
//! [`Record`] keeps only the fields qrkdns manages. Everything else a
//! provider returns is dropped at the provider boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL policy for managed records (1 = "automatic" on Cloudflare)
pub const DEFAULT_TTL: u32 = 1;

/// DNS record type
///
/// Only A records are managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[default]
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A locally-managed DNS record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned identifier, empty until the record is created
    pub id: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Fully-qualified domain name
    pub name: String,
    /// IP address
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether the provider proxies traffic for this record
    pub proxied: bool,
}

impl Record {
    /// Build the A record qrkdns wants for `name` pointing at `content`
    pub fn a(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            record_type: RecordType::A,
            name: name.into(),
            content: content.into(),
            ttl: DEFAULT_TTL,
            proxied: false,
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Compare managed fields, optionally including `id`.
    ///
    /// Every managed field must be listed here.
    pub fn equal(&self, other: &Record, match_id: bool) -> bool {
        if match_id && self.id != other.id {
            return false;
        }

        self.record_type == other.record_type
            && self.name == other.name
            && self.content == other.content
            && self.ttl == other.ttl
            && self.proxied == other.proxied
    }

    /// Whether the record has been assigned an id by the provider
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Provider-side filter for listing records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    /// Record type to match
    pub record_type: RecordType,
    /// Exact fully-qualified name to match
    pub name: String,
}

impl RecordFilter {
    /// Filter for A records named `name`
    pub fn a(name: impl Into<String>) -> Self {
        Self {
            record_type: RecordType::A,
            name: name.into(),
        }
    }
}

/// Join a subdomain and base domain into a fully-qualified name
pub fn fqdn(subdomain: &str, domain: &str) -> String {
    format!("{}.{}", subdomain, domain)
}
