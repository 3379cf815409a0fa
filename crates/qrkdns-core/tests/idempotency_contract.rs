//! Contract Test: Idempotency & Convergence
//!
//! Constraints verified:
//! - A second pass against a stable provider makes no writes
//! - Any starting set of same-name records converges to exactly one
//! - A record that already holds the IP keeps its id
//!
//! If this test fails, repeated syncs churn the zone.

mod common;

use common::*;
use qrkdns_core::Record;
use std::sync::Arc;

fn starting_zones() -> Vec<Vec<Record>> {
    vec![
        vec![],
        vec![bar_record("a", "1.2.3.4")],
        vec![bar_record("a", "1.2.3.4").with_ttl(300)],
        vec![bar_record("a", "4.3.2.1")],
        vec![bar_record("a", "4.3.2.1"), bar_record("b", "5.6.7.8")],
        vec![bar_record("a", "1.2.3.4"), bar_record("b", "1.2.3.4")],
        vec![
            bar_record("a", "4.3.2.1"),
            bar_record("b", "1.2.3.4").with_ttl(120),
            bar_record("c", "1.2.3.4"),
        ],
    ]
}

#[tokio::test]
async fn second_apply_makes_no_writes() {
    for zone in starting_zones() {
        let provider = Arc::new(MockDnsProvider::with_records(zone.clone()));
        let reconciler = reconciler(&provider);

        let first = reconciler.apply("bar", "1.2.3.4").await.unwrap();
        provider.clear_calls();

        let second = reconciler.apply("bar", "1.2.3.4").await.unwrap();

        assert!(
            provider.writes().is_empty(),
            "Second pass wrote {:?} for starting zone {:?}",
            provider.writes(),
            zone
        );
        assert!(first.equal(&second, true));
    }
}

#[tokio::test]
async fn every_starting_zone_converges_to_one_record() {
    for zone in starting_zones() {
        let provider = Arc::new(MockDnsProvider::with_records(zone.clone()));
        let reconciler = reconciler(&provider);

        let record = reconciler.apply("bar", "1.2.3.4").await.unwrap();

        let remaining = provider.records_named("bar.qrkdns.net");
        assert_eq!(remaining.len(), 1, "Starting zone {:?} left {:?}", zone, remaining);
        assert_eq!(remaining[0].content, "1.2.3.4");
        assert!(remaining[0].equal(&record, true));
    }
}

#[tokio::test]
async fn content_match_keeps_its_id() {
    for zone in starting_zones() {
        let first_match = zone.iter().find(|r| r.content == "1.2.3.4").cloned();
        let Some(first_match) = first_match else {
            continue;
        };

        let provider = Arc::new(MockDnsProvider::with_records(zone.clone()));
        let reconciler = reconciler(&provider);

        let record = reconciler.apply("bar", "1.2.3.4").await.unwrap();

        assert_eq!(record.id, first_match.id, "Starting zone {:?}", zone);
        assert!(
            !provider.writes().contains(&Call::Delete(first_match.id.clone())),
            "Matching record must never be deleted"
        );
        assert_eq!(provider.count(Op::Create), 0);
    }
}

#[tokio::test]
async fn ip_change_moves_the_record() {
    let provider = Arc::new(MockDnsProvider::new());
    let reconciler = reconciler(&provider);

    let old = reconciler.apply("bar", "1.2.3.4").await.unwrap();
    let new = reconciler.apply("bar", "4.3.2.1").await.unwrap();

    assert_ne!(old.id, new.id);
    assert_eq!(provider.records_named("bar.qrkdns.net"), vec![new]);
}
