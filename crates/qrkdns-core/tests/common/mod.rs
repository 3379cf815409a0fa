//! Test doubles and common utilities for contract tests
//!
//! `MockDnsProvider` is an in-memory zone that records every call in
//! order, so tests can assert both the final state and the exact sequence
//! of provider operations.

#![allow(dead_code)]

use async_trait::async_trait;
use qrkdns_core::error::{Error, Result};
use qrkdns_core::traits::{DnsProvider, IpSource};
use qrkdns_core::{Record, RecordFilter, Reconciler, ZoneClient};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DOMAIN: &str = "qrkdns.net";
pub const ZONE_ID: &str = "zone1234";

/// One provider call, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ResolveZone(String),
    List(String),
    Get(String),
    Create(Record),
    Update(String, Record),
    Delete(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Create(_) | Call::Update(..) | Call::Delete(_))
    }
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ResolveZone,
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// In-memory provider that records calls
pub struct MockDnsProvider {
    records: Mutex<Vec<Record>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<Op, String>>,
    next_id: AtomicUsize,
    delay: Option<Duration>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start with `records` already in the zone, in listing order
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            delay: None,
        }
    }

    /// Sleep before answering every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make `op` fail with `message` until cleared
    pub fn fail(&self, op: Op, message: &str) {
        self.failures.lock().unwrap().insert(op, message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(
                    (op, call),
                    (Op::ResolveZone, Call::ResolveZone(_))
                        | (Op::List, Call::List(_))
                        | (Op::Get, Call::Get(_))
                        | (Op::Create, Call::Create(_))
                        | (Op::Update, Call::Update(..))
                        | (Op::Delete, Call::Delete(_))
                )
            })
            .count()
    }

    /// Current zone contents
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    /// Records named `name`
    pub fn records_named(&self, name: &str) -> Vec<Record> {
        self.records()
            .into_iter()
            .filter(|r| r.name == name)
            .collect()
    }

    async fn enter(&self, op: Op, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failures.lock().unwrap().get(&op) {
            Some(message) => Err(Error::provider("mock", message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn resolve_zone_id(&self, domain: &str) -> Result<String> {
        self.enter(Op::ResolveZone, Call::ResolveZone(domain.to_string()))
            .await?;
        Ok(ZONE_ID.to_string())
    }

    async fn list_records(&self, zone_id: &str, filter: &RecordFilter) -> Result<Vec<Record>> {
        self.enter(Op::List, Call::List(filter.name.clone())).await?;
        assert_eq!(zone_id, ZONE_ID);
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.name == filter.name && r.record_type == filter.record_type)
            .collect())
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<Record> {
        self.enter(Op::Get, Call::Get(record_id.to_string())).await?;
        assert_eq!(zone_id, ZONE_ID);
        self.records()
            .into_iter()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::provider("mock", format!("record {} not found", record_id)))
    }

    async fn create_record(&self, zone_id: &str, record: &Record) -> Result<Record> {
        self.enter(Op::Create, Call::Create(record.clone())).await?;
        assert_eq!(zone_id, ZONE_ID);
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = record.clone().with_id(id);
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_record(&self, zone_id: &str, record_id: &str, record: &Record) -> Result<()> {
        self.enter(Op::Update, Call::Update(record_id.to_string(), record.clone()))
            .await?;
        assert_eq!(zone_id, ZONE_ID);
        let mut records = self.records.lock().unwrap();
        let stored = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::provider("mock", format!("record {} not found", record_id)))?;
        *stored = record.clone().with_id(record_id);
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.enter(Op::Delete, Call::Delete(record_id.to_string()))
            .await?;
        assert_eq!(zone_id, ZONE_ID);
        self.records.lock().unwrap().retain(|r| r.id != record_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// IP source that always answers with the same address
pub struct StaticIpSource {
    ip: String,
    call_count: AtomicUsize,
}

impl StaticIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip.clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// IP source that always fails like a lookup service answering 404
pub struct FailingIpSource;

#[async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<String> {
        Err(Error::network("Received status code 404: not found"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// Reconciler over `provider` for the test domain
pub fn reconciler(provider: &Arc<MockDnsProvider>) -> Reconciler {
    Reconciler::new(ZoneClient::new(provider.clone(), DOMAIN))
}

/// Managed A record for `bar.qrkdns.net`
pub fn bar_record(id: &str, ip: &str) -> Record {
    Record::a(format!("bar.{}", DOMAIN), ip).with_id(id)
}
