//! End-to-end delegation diagnostics against a scripted resolver.
//!
//! These tests drive the public API the way an embedding application would:
//! build a service over an injected resolver, analyze a domain, and inspect
//! the assembled report.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::{ScriptedResolver, ns_answer, referral};
use dns_delver::{
    AnalysisOptions, DelegationService, DelegationStatus, DelverConfig, DelverError, GlueStatus,
    RecordKind,
};

/// A fully healthy scripted world for example.com: clean trace, matching
/// glue, symmetric cross-references.
fn healthy_world() -> ScriptedResolver {
    ScriptedResolver::new()
        .with_records(".", RecordKind::Ns, &["a.root-servers.net"])
        .with_records("com", RecordKind::Ns, &["a.gtld-servers.net"])
        .with_records(
            "example.com",
            RecordKind::Ns,
            &["ns1.example.com", "ns2.example.com"],
        )
        .with_records("a.root-servers.net", RecordKind::A, &["198.41.0.4"])
        .with_records("a.gtld-servers.net", RecordKind::A, &["192.5.6.30"])
        .with_records("ns1.example.com", RecordKind::A, &["192.0.2.1"])
        .with_records("ns2.example.com", RecordKind::A, &["192.0.2.2"])
        .with_raw(
            "com",
            "198.41.0.4",
            referral("com", &["a.gtld-servers.net"], &[]),
        )
        .with_raw(
            "example.com",
            "192.5.6.30",
            referral(
                "example.com",
                &["ns1.example.com", "ns2.example.com"],
                &[
                    ("ns1.example.com", RecordKind::A, "192.0.2.1"),
                    ("ns2.example.com", RecordKind::A, "192.0.2.2"),
                ],
            ),
        )
        .with_raw(
            "example.com",
            "192.0.2.1",
            ns_answer("example.com", &["ns1.example.com", "ns2.example.com"]),
        )
        .with_raw(
            "example.com",
            "192.0.2.2",
            ns_answer("example.com", &["ns1.example.com", "ns2.example.com"]),
        )
}

fn service_over(resolver: ScriptedResolver) -> DelegationService {
    DelegationService::with_resolver(Arc::new(resolver), DelverConfig::default())
}

// ==================== full analysis ====================

#[tokio::test]
async fn test_healthy_domain_scores_a_clean_ten() {
    let service = service_over(healthy_world());
    let report = service
        .analyze("example.com", &AnalysisOptions::default())
        .await
        .unwrap();

    assert_eq!(report.domain, "example.com");
    assert_eq!(report.chain, vec![".", "com", "example.com"]);
    assert_eq!(report.trace.len(), 3);
    assert!(report.trace.iter().all(|node| node.status == DelegationStatus::Ok));
    assert_eq!(report.glue["."].status, GlueStatus::Skipped);
    assert!(report.glue.values().all(|zone| zone.issues.is_empty()));

    let ns1 = &report.cross_references["ns1.example.com"];
    assert!(ns1.self_reference);
    assert!(ns1
        .mutual_references
        .contains(&"ns2.example.com".to_string()));

    assert!((report.health.score - 10.0).abs() < f64::EPSILON);
    assert!((report.health.percentage - 100.0).abs() < f64::EPSILON);
    assert!(report
        .health
        .breakdown
        .iter()
        .all(|line| !line.starts_with('-')));
}

#[tokio::test]
async fn test_verbose_analysis_attaches_nameserver_addresses() {
    let service = service_over(healthy_world());
    let options = AnalysisOptions {
        verbose: true,
        check_glue: true,
    };
    let report = service.analyze("example.com", &options).await.unwrap();

    let info = report.trace[2].verbose_info.as_deref().unwrap();
    assert!(info.contains("ns1.example.com A: 192.0.2.1"));
}

#[tokio::test]
async fn test_broken_tld_truncates_the_chain() {
    let resolver = ScriptedResolver::new()
        .with_records(".", RecordKind::Ns, &["a.root-servers.net"])
        .with_failure("com", RecordKind::Ns, dns_delver::LookupErrorKind::NxDomain)
        .with_records("example.com", RecordKind::Ns, &["ns1.example.com"]);
    let service = service_over(resolver);
    let report = service
        .analyze("example.com", &AnalysisOptions::default())
        .await
        .unwrap();

    assert_eq!(report.chain.len(), 2);
    assert_eq!(report.trace.len(), 2);
    assert_eq!(report.trace[1].status, DelegationStatus::Nxdomain);
    assert!(report.trace[1].trace_stopped);
    assert!(report.cross_references.is_empty());
    assert!(report.health.score < 10.0);
}

#[tokio::test]
async fn test_glue_mismatch_is_reported_and_scored() {
    let resolver = healthy_world()
        // Override: the parent hands out a different address for ns1 than
        // the nameserver actually resolves to.
        .with_raw(
            "example.com",
            "192.5.6.30",
            referral(
                "example.com",
                &["ns1.example.com", "ns2.example.com"],
                &[
                    ("ns1.example.com", RecordKind::A, "203.0.113.99"),
                    ("ns2.example.com", RecordKind::A, "192.0.2.2"),
                ],
            ),
        );
    let service = service_over(resolver);
    let report = service
        .analyze("example.com", &AnalysisOptions::default())
        .await
        .unwrap();

    let zone = &report.glue["example.com"];
    assert_eq!(zone.status, GlueStatus::Success);
    assert!(zone
        .issues
        .iter()
        .any(|issue| issue.contains("don't match")));
    assert!(report
        .health
        .breakdown
        .contains(&"-1 points: 1 major glue issue found".to_string()));
    assert!(report.health.score < 10.0);
}

// ==================== comparison and overview ====================

#[tokio::test]
async fn test_compare_summarizes_and_isolates_bad_input() {
    let service = service_over(healthy_world());
    let domains = vec!["example.com".to_string(), "10.0.0.1".to_string()];
    let comparison = service.compare(&domains).await.unwrap();

    assert_eq!(comparison.total_domains, 2);
    assert_eq!(comparison.successful_domains, 1);
    assert_eq!(comparison.results["example.com"].nameserver_count, 4);
    assert!(comparison.results["10.0.0.1"]
        .error
        .as_deref()
        .unwrap()
        .contains("Invalid domain format"));
}

#[tokio::test]
async fn test_nameserver_overview_lists_addresses() {
    let service = service_over(healthy_world());
    let overview = service.nameserver_overview("example.com").await.unwrap();

    assert_eq!(overview.nameservers.len(), 2);
    assert_eq!(
        overview.nameserver_info["ns1.example.com"].a_records,
        vec!["192.0.2.1"]
    );
}

// ==================== validation and serialization ====================

#[tokio::test]
async fn test_validation_rejects_addresses_and_empty_input() {
    let service = service_over(healthy_world());

    assert!(matches!(
        service.trace("", false).await,
        Err(DelverError::ValidationError(_))
    ));
    assert!(matches!(
        service.analyze("192.0.2.7", &AnalysisOptions::default()).await,
        Err(DelverError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_report_serializes_with_camel_case_keys() {
    let service = service_over(healthy_world());
    let report = service
        .analyze("example.com", &AnalysisOptions::default())
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["dnsServerUsed"], "scripted");
    assert!(value["crossReferences"].is_object());
    assert_eq!(value["health"]["maxScore"], 10.0);
    assert_eq!(value["trace"][0]["zone"], ".");
    assert_eq!(value["trace"][0]["responseTimeMs"], value["timing"]["."]["responseTimeMs"]);
}
