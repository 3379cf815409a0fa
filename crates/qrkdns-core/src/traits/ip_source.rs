// # IP Source Trait
//
// Defines how qrkdns learns the host's current public IP address.
//
// ## Implementations
//
// - HTTP lookup service: `qrkdns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use qrkdns_core::IpSource;
//
// async fn show(source: &dyn IpSource) -> qrkdns_core::Result<()> {
//     println!("External IP: {}", source.current().await?);
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// They observe the network; they never decide whether DNS needs to change.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current external IP address
    ///
    /// The address is returned as text with surrounding whitespace removed,
    /// exactly as it will be written into the record content.
    ///
    /// # Errors
    ///
    /// [`Error::Network`](crate::Error::Network) when the lookup fails.
    async fn current(&self) -> Result<String, crate::Error>;

    /// Name of the source (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
