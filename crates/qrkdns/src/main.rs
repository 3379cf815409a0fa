// # qrkdns
//
// Thin integration layer: parses flags, sets up logging, wires the
// Cloudflare provider and HTTP IP source into a `SyncJob`, then runs it
// once or on a cron schedule. All DNS logic lives in qrkdns-core.
//
// ## Example
//
// ```bash
// export CLOUDFLARE_ACCOUNT_ID=...
// export CLOUDFLARE_API_TOKEN=...
//
// # one pass
// qrkdns sync --network-id home
//
// # every five minutes until SIGINT/SIGTERM
// qrkdns sync cron --schedule "*/5 * * * *" --network-id home
// ```

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{Level, debug, error, info, warn};

use cli::{Cli, Command, LogFormat, SyncArgs, SyncMode};
use qrkdns_core::{CronScheduler, ProviderRegistry, Reconciler, SyncConfig, SyncJob, ZoneClient};
use qrkdns_ip_http::HttpIpSource;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Success or clean shutdown
/// - 1: Configuration error (flags, env, cron expression)
/// - 2: Runtime error (IP lookup, provider, timeout)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QrkdnsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<QrkdnsExitCode> for ExitCode {
    fn from(code: QrkdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl QrkdnsExitCode {
    /// Classify a top-level failure
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<qrkdns_core::Error>() {
            Some(qrkdns_core::Error::Config(_)) | Some(qrkdns_core::Error::Schedule(_)) => {
                Self::ConfigError
            }
            _ => Self::RuntimeError,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                QrkdnsExitCode::ConfigError.into()
            } else {
                QrkdnsExitCode::Success.into()
            };
        }
    };

    if let Err(e) = init_tracing(&cli.log_level, cli.log_format) {
        eprintln!("{:#}", e);
        return QrkdnsExitCode::ConfigError.into();
    }

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting qrkdns");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return QrkdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Command::Sync(args) => run_sync(args).await,
        }
    });

    match result {
        Ok(()) => QrkdnsExitCode::Success.into(),
        Err(e) => {
            error!(error = %format!("{:#}", e), "qrkdns failed");
            QrkdnsExitCode::for_error(&e).into()
        }
    }
}

/// Install the global tracing subscriber
fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let level: Level = level.trim().parse().map_err(|_| {
        qrkdns_core::Error::config(format!(
            "invalid log level '{}': expected one of trace, debug, info, warn, error",
            level
        ))
    })?;

    let builder = tracing_subscriber::fmt().with_max_level(level);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// `qrkdns sync` and `qrkdns sync cron`
async fn run_sync(mut args: SyncArgs) -> Result<()> {
    let mode = args.mode.take();
    let config = args.to_config()?;

    // parse the schedule before touching the network
    let scheduler = match mode {
        Some(SyncMode::Cron { schedule }) => Some(CronScheduler::new(&schedule)?),
        None => None,
    };

    let job = build_job(&config)?;

    match scheduler {
        None => {
            let zone_id = job
                .resolve_zone()
                .await
                .context("failed to initialize DNS client")?;
            debug!(zone_id, domain = %config.domain, "Resolved zone");

            job.run_once().await.context("sync failed")?;
            Ok(())
        }
        Some(scheduler) => {
            let (shutdown_tx, shutdown_rx) = oneshot::channel();
            tokio::spawn(async move {
                match wait_for_shutdown().await {
                    Ok(name) => info!("Received shutdown signal: {}", name),
                    Err(e) => error!("Shutdown handler error: {}", e),
                }
                let _ = shutdown_tx.send(());
            });

            run_cron(&job, &scheduler, shutdown_rx).await?;

            info!("Shutting down");
            Ok(())
        }
    }
}

/// Run `job` on every tick of `scheduler` until `shutdown_rx` fires
///
/// The zone is looked up once before the first tick so a bad domain or
/// token shows up in the log right away. A failed lookup does not stop the
/// scheduler; every pass retries it.
async fn run_cron(
    job: &SyncJob,
    scheduler: &CronScheduler,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<()> {
    match job.resolve_zone().await {
        Ok(zone_id) => debug!(zone_id, "Resolved zone"),
        Err(e) => warn!(error = %e, "Zone lookup failed, retrying on the next tick"),
    }

    scheduler
        .run_with_shutdown(
            || {
                let job = job.clone();
                async move { job.run_once().await }
            },
            Some(shutdown_rx),
        )
        .await?;
    Ok(())
}

/// Wire provider, zone client and IP source into a job
fn build_job(config: &SyncConfig) -> Result<SyncJob> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "cloudflare")]
    qrkdns_provider_cloudflare::register(&registry);

    debug!(providers = ?registry.list_providers(), "Registered DNS providers");

    let provider = registry.create_provider(&config.provider)?;
    let client = ZoneClient::new(Arc::from(provider), config.domain.clone());

    let ip_source = Arc::new(HttpIpSource::new(config.ip_service_url.clone()));
    let reconciler = Arc::new(Reconciler::new(client));

    Ok(SyncJob::new(ip_source, reconciler, config.network_id.clone()).with_timeout(config.timeout))
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
