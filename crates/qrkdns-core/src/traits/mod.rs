//! Core traits for qrkdns
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Look up the host's public IP address
//! - [`DnsProvider`]: Zone-scoped record operations against a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsProviderFactory};
