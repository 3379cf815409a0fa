//! Cron-driven repetition of a sync job
//!
//! [`CronScheduler`] owns the caller's loop: it sleeps until the next cron
//! tick, runs the job, logs the outcome and repeats.
//!
//! ## Tick policy
//!
//! - One run at a time. The next tick is computed only after the current
//!   run finishes, so a slow run never overlaps the next one.
//! - Ticks that pass while a run is in flight are skipped, not queued.
//! - A failed run is logged and the schedule keeps going.
//!
//! ## Expressions
//!
//! Classic 5-field crontab lines (`*/5 * * * *`) fire at second zero of the
//! matching minute. 6- and 7-field expressions with a leading seconds field
//! (and optional trailing year) are passed through unchanged.

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Local};
use cron::Schedule;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::error::{Error, Result};

/// Parsed cron schedule driving repeated job runs
#[derive(Debug, Clone)]
pub struct CronScheduler {
    expression: String,
    schedule: Schedule,
}

impl CronScheduler {
    /// Parse a cron expression
    ///
    /// # Errors
    ///
    /// [`Error::Schedule`] when the expression cannot be parsed.
    pub fn new(expression: &str) -> Result<Self> {
        let normalized = normalize_expression(expression);
        let schedule = Schedule::from_str(&normalized).map_err(|e| {
            Error::schedule(format!(
                "cron expression failed to be parsed: '{}': {}",
                expression, e
            ))
        })?;

        Ok(Self {
            expression: expression.trim().to_string(),
            schedule,
        })
    }

    /// The expression as given by the user
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Next tick strictly after now, in local time
    pub fn next_tick(&self) -> Option<DateTime<Local>> {
        self.schedule.upcoming(Local).next()
    }

    /// Run `job` on every tick, forever
    pub async fn run<F, Fut, T>(&self, job: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_with_shutdown(job, None).await
    }

    /// Run `job` on every tick until `shutdown_rx` fires
    ///
    /// With `None` this never returns unless the schedule has no further
    /// ticks. A shutdown that arrives mid-run drops the in-flight run.
    pub async fn run_with_shutdown<F, Fut, T>(
        &self,
        mut job: F,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(shutdown);

        info!(schedule = %self.expression, "Running cron scheduler");

        let mut tick: u64 = 0;
        loop {
            let next = self.next_tick().ok_or_else(|| {
                Error::schedule(format!("schedule '{}' has no upcoming ticks", self.expression))
            })?;
            let wait = (next - Local::now()).to_std().unwrap_or_default();
            debug!(next = %next, ?wait, "Waiting for next tick");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping scheduler");
                    return Ok(());
                }
            }

            tick += 1;
            tokio::select! {
                result = job() => match result {
                    Ok(_) => debug!(tick, "Scheduled run finished"),
                    Err(e) => error!(tick, error = %e, "Scheduled run failed"),
                },
                _ = &mut shutdown => {
                    info!(tick, "Shutdown signal received during run, stopping scheduler");
                    return Ok(());
                }
            }
        }
    }
}

/// Prepend a seconds field to classic 5-field crontab lines
fn normalize_expression(expression: &str) -> String {
    let expression = expression.trim();
    if expression.split_whitespace().count() == 5 {
        format!("0 {}", expression)
    } else {
        expression.to_string()
    }
}
