//! Record reconciliation
//!
//! The [`Reconciler`] converges the provider's A records for one subdomain
//! to exactly one record with the desired content.
//!
//! ## Pass
//!
//! ```text
//! list ──► select ──► converge ──────────────► cleanup
//!            │          ├─ unchanged (no write)    │
//!            │          ├─ update + re-fetch       ├─ delete every other id
//!            │          └─ create                  │
//! ```
//!
//! 1. List A records named `<subdomain>.<domain>`
//! 2. The first listed record whose content equals the IP is chosen
//! 3. Chosen and up to date: nothing to write. Chosen with drifted
//!    fields: update it, then re-fetch it. Nothing chosen: create one.
//! 4. Delete every listed record whose id differs from the final record
//!
//! Calls are strictly sequential and the first failure aborts the pass.
//! Writes already made stay made; the next pass finishes the job.

use tracing::{debug, info};

use crate::error::Result;
use crate::record::Record;
use crate::zone::ZoneClient;

/// What the converge step did to the final record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergeAction {
    /// An existing record already matched
    Unchanged,
    /// An existing record with the right content had drifted fields
    Updated,
    /// No record had the right content
    Created,
}

/// Drives a [`ZoneClient`] to the desired record state
#[derive(Debug)]
pub struct Reconciler {
    client: ZoneClient,
}

impl Reconciler {
    /// Create a reconciler over an already-bound zone client
    pub fn new(client: ZoneClient) -> Self {
        Self { client }
    }

    /// The zone client this reconciler writes through
    pub fn client(&self) -> &ZoneClient {
        &self.client
    }

    /// Build the record qrkdns wants for `subdomain`
    pub fn expected_record(&self, subdomain: &str, ip_address: &str) -> Record {
        Record::a(self.client.fqdn(subdomain), ip_address)
    }

    /// Converge `<subdomain>.<domain>` to a single A record holding `ip_address`
    ///
    /// Returns the record that remains: reused, updated (as re-fetched from
    /// the provider) or newly created.
    ///
    /// # Errors
    ///
    /// The first failing provider call, with the operation attached.
    pub async fn apply(&self, subdomain: &str, ip_address: &str) -> Result<Record> {
        let expected = self.expected_record(subdomain, ip_address);
        let existing = self.client.list_a_records(subdomain).await?;

        debug!(
            record = %expected.name,
            ip = %expected.content,
            existing = existing.len(),
            "Listed existing records"
        );

        let (record, action) = self.converge(&expected, &existing).await?;

        match action {
            ConvergeAction::Unchanged => {
                debug!(record = %record.name, id = %record.id, "Record is already up to date");
            }
            ConvergeAction::Updated => {
                info!(record = %record.name, id = %record.id, ip = %record.content, "Updated record");
            }
            ConvergeAction::Created => {
                info!(record = %record.name, id = %record.id, ip = %record.content, "Created record");
            }
        }

        self.cleanup(&record, &existing).await?;

        Ok(record)
    }

    /// Pick the record to keep and bring it to the expected state
    async fn converge(
        &self,
        expected: &Record,
        existing: &[Record],
    ) -> Result<(Record, ConvergeAction)> {
        // earliest content match wins
        let chosen = existing.iter().find(|r| r.content == expected.content);

        match chosen {
            Some(record) if record.equal(expected, false) => {
                Ok((record.clone(), ConvergeAction::Unchanged))
            }
            Some(record) => {
                debug!(
                    record = %record.name,
                    id = %record.id,
                    ttl = record.ttl,
                    proxied = record.proxied,
                    "Updating drifted record"
                );
                self.client.update_record(&record.id, expected).await?;
                let refreshed = self.client.get_record(&record.id).await?;
                Ok((refreshed, ConvergeAction::Updated))
            }
            None => {
                debug!(record = %expected.name, ip = %expected.content, "Creating record");
                let created = self.client.create_record(expected).await?;
                Ok((created, ConvergeAction::Created))
            }
        }
    }

    /// Delete every listed record other than `keep`
    async fn cleanup(&self, keep: &Record, existing: &[Record]) -> Result<()> {
        for record in existing.iter().filter(|r| r.id != keep.id) {
            debug!(
                record = %record.name,
                id = %record.id,
                content = %record.content,
                "Deleting extra record"
            );
            self.client.delete_record(&record.id).await?;
        }
        Ok(())
    }
}
