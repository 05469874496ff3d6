//! Assembly of the individual checks into complete diagnostic reports.

use std::collections::BTreeMap;

use chrono::Utc;
use futures::future;

use crate::config::DelverConfig;
use crate::error::{DelverError, DelverResult};
use crate::resolver::{RecordKind, Resolver};
use crate::types::{
    AnalysisOptions, ComparisonReport, DelegationReport, DelegationStatus, DelegationTrace,
    DomainComparison, NameserverInfo, NameserverOverview,
};

use super::cross_ref::cross_reference;
use super::glue::check_glue_records;
use super::score::health_score;
use super::trace::trace_delegation;
use super::validate_domain;

/// Run the full diagnosis for one already-validated domain.
///
/// The trace runs first; glue validation and the cross-reference check are
/// independent of each other and run concurrently afterwards. Cross-references
/// are only gathered when the terminal trace layer produced a clean NS set.
pub(crate) async fn analyze(
    resolver: &dyn Resolver,
    config: &DelverConfig,
    domain: &str,
    options: &AnalysisOptions,
) -> DelegationReport {
    let trace = trace_delegation(resolver, config, domain, options.verbose).await;

    let last_level_ns: Vec<String> = trace
        .nodes
        .last()
        .filter(|node| node.status == DelegationStatus::Ok)
        .map(|node| node.nameservers.clone())
        .unwrap_or_default();

    let glue_task = async {
        if options.check_glue {
            check_glue_records(resolver, domain).await
        } else {
            BTreeMap::new()
        }
    };
    let cross_task = async {
        if last_level_ns.is_empty() {
            BTreeMap::new()
        } else {
            cross_reference(resolver, domain, &last_level_ns).await
        }
    };
    let (glue, cross_references) = future::join(glue_task, cross_task).await;

    let health = health_score(&trace.nodes, &glue, &cross_references, &config.weights);

    let DelegationTrace {
        domain,
        chain,
        nodes,
        timing,
    } = trace;

    DelegationReport {
        domain,
        dns_server_used: resolver.describe(),
        timestamp: Utc::now(),
        chain,
        trace: nodes,
        timing,
        glue,
        cross_references,
        health,
    }
}

/// Trace several domains and summarize each for side-by-side comparison.
///
/// Domains that fail validation get an error entry instead of failing the
/// whole batch.
pub(crate) async fn compare(
    resolver: &dyn Resolver,
    config: &DelverConfig,
    domains: &[String],
) -> ComparisonReport {
    let mut results = BTreeMap::new();
    for raw in domains {
        match validate_domain(raw) {
            Ok(domain) => {
                let trace = trace_delegation(resolver, config, &domain, false).await;
                results.insert(domain, summarize_trace(trace));
            }
            Err(e) => {
                results.insert(
                    raw.clone(),
                    DomainComparison {
                        trace: vec![],
                        total_response_time_ms: 0,
                        slow_responses: 0,
                        nameserver_count: 0,
                        error: Some(e.to_string()),
                    },
                );
            }
        }
    }

    let successful_domains = results
        .values()
        .filter(|entry| entry.error.is_none())
        .count();

    ComparisonReport {
        results,
        dns_server_used: resolver.describe(),
        timestamp: Utc::now(),
        total_domains: domains.len(),
        successful_domains,
    }
}

fn summarize_trace(trace: DelegationTrace) -> DomainComparison {
    let total_response_time_ms = trace.nodes.iter().map(|node| node.response_time_ms).sum();
    let slow_responses = trace.nodes.iter().filter(|node| node.is_slow).count();
    let nameserver_count = trace.nodes.iter().map(|node| node.nameservers.len()).sum();
    DomainComparison {
        trace: trace.nodes,
        total_response_time_ms,
        slow_responses,
        nameserver_count,
        error: None,
    }
}

/// List a domain's nameservers with their resolved addresses.
///
/// A failed NS lookup fails the call; failed address lookups for individual
/// nameservers just leave their record lists empty.
pub(crate) async fn nameserver_overview(
    resolver: &dyn Resolver,
    domain: &str,
) -> DelverResult<NameserverOverview> {
    let nameservers = resolver
        .resolve(domain, RecordKind::Ns)
        .await
        .map_err(|e| DelverError::NetworkError(e.to_string()))?;

    let mut nameserver_info = BTreeMap::new();
    for ns in &nameservers {
        let mut info = NameserverInfo::default();
        if let Ok(records) = resolver.resolve(ns, RecordKind::A).await {
            info.a_records = records;
        }
        if let Ok(records) = resolver.resolve(ns, RecordKind::Aaaa).await {
            info.aaaa_records = records;
        }
        nameserver_info.insert(ns.clone(), info);
    }

    Ok(NameserverOverview {
        domain: domain.to_string(),
        nameservers,
        nameserver_info,
        dns_server_used: resolver.describe(),
    })
}

// ==================== report assembly tests ====================
