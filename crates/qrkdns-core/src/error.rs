//! Error types for qrkdns
//!
//! One error enum covers every library crate in the workspace. The binary
//! wraps it in `anyhow` only at the very top.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for qrkdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for qrkdns
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid settings (flags, env vars, timeout strings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IP lookup failures: transport, body read, or non-200 status
    #[error("Network error: {0}")]
    Network(String),

    /// Any DNS API failure, including zone-not-found and auth failures
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Invalid cron expression
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// A sync pass exceeded its deadline
    #[error("Sync timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a schedule error
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule(msg.into())
    }

    /// Prefix a provider error with the operation that produced it.
    ///
    /// Other kinds pass through untouched.
    pub fn context(self, operation: &str) -> Self {
        match self {
            Self::Provider { provider, message } => Self::Provider {
                provider,
                message: format!("{operation}: {message}"),
            },
            other => other,
        }
    }

    /// Whether this error came from the DNS provider
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
