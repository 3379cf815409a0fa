// # qrkdns-core
//
// Core library for the qrkdns dynamic DNS updater.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for looking up the host's public IP address
// - **DnsProvider**: Trait for zone-scoped record operations on a provider API
// - **ZoneClient**: Binds a provider to one base domain and caches its zone id
// - **Reconciler**: Converges one subdomain to a single A record
// - **SyncJob**: One pass of IP lookup followed by reconciliation
// - **CronScheduler**: Repeats a job on a cron schedule
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decisions live here, HTTP lives in plugin crates
// 2. **Explicit Wiring**: Providers and IP sources are passed in, never global
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: A second pass against an unchanged provider writes nothing

pub mod traits;
pub mod record;
pub mod zone;
pub mod reconciler;
pub mod sync;
pub mod scheduler;
pub mod registry;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, DnsProviderFactory};
pub use record::{Record, RecordFilter, RecordType, DEFAULT_TTL, fqdn};
pub use zone::ZoneClient;
pub use reconciler::{Reconciler, ConvergeAction};
pub use sync::SyncJob;
pub use scheduler::CronScheduler;
pub use registry::ProviderRegistry;
pub use config::{ProviderConfig, ProviderType, SyncConfig};
pub use error::{Error, Result};
