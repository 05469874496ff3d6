//! Delegation tracer: walks the zone chain from the root to the domain.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::DelverConfig;
use crate::resolver::{LookupError, LookupErrorKind, RecordKind, Resolver};
use crate::types::{DelegationStatus, DelegationTrace, TraceNode, ZoneTiming};

use super::chain::build_zone_chain;

/// Walk the delegation chain for `domain`, querying NS at every level.
///
/// The walk is resilient: failures become nodes, and tracing stops only where
/// continuing makes no sense. Definitive failures (NXDOMAIN, no NS records,
/// timeout, no usable upstreams) always stop; an unclassified failure stops
/// only below the TLD level, where it can no longer be a transient hiccup of
/// the root or TLD infrastructure.
pub(crate) async fn trace_delegation(
    resolver: &dyn Resolver,
    config: &DelverConfig,
    domain: &str,
    verbose: bool,
) -> DelegationTrace {
    let mut chain = build_zone_chain(domain);
    let mut nodes: Vec<TraceNode> = Vec::new();
    let mut timing: BTreeMap<String, ZoneTiming> = BTreeMap::new();
    let mut should_continue = true;

    for (i, zone) in chain.iter().enumerate() {
        if !should_continue {
            break;
        }

        let start = Instant::now();
        let outcome = match resolver.resolve(zone, RecordKind::Ns).await {
            Ok(records) if records.is_empty() => Err(LookupError::new(
                LookupErrorKind::NoRecords,
                format!("no NS records for {zone}"),
            )),
            other => other,
        };
        // u128 -> u64: elapsed millis for a DNS query will never exceed u64::MAX
        #[allow(clippy::cast_possible_truncation)]
        let response_time_ms = start.elapsed().as_millis() as u64;

        let (status, nameservers, error, verbose_info) = match outcome {
            Ok(nameservers) => {
                let verbose_info = if verbose {
                    Some(verbose_nameserver_info(resolver, &nameservers).await)
                } else {
                    None
                };
                (DelegationStatus::Ok, nameservers, None, verbose_info)
            }
            Err(e) => {
                let (status, error, verbose_msg) = describe_failure(zone, &e);
                if status == DelegationStatus::Other {
                    // Root and TLD hiccups are tolerated; deeper ones are not.
                    should_continue = i <= 1;
                } else {
                    should_continue = false;
                }
                (status, vec![], Some(error), verbose.then_some(verbose_msg))
            }
        };

        let is_slow = response_time_ms > config.slow_threshold_ms;
        timing.insert(
            zone.clone(),
            ZoneTiming {
                response_time_ms,
                is_slow,
                status,
            },
        );
        nodes.push(TraceNode {
            zone: zone.clone(),
            nameservers,
            status,
            error,
            verbose_info,
            response_time_ms,
            is_slow,
            trace_stopped: !should_continue && i < chain.len() - 1,
        });
    }

    if nodes.len() < chain.len() {
        chain.truncate(nodes.len());
    }

    DelegationTrace {
        domain: domain.to_string(),
        chain,
        nodes,
        timing,
    }
}

/// Status plus human-readable detail for a failed NS query.
fn describe_failure(zone: &str, err: &LookupError) -> (DelegationStatus, String, String) {
    match err.kind {
        LookupErrorKind::NxDomain => (
            DelegationStatus::Nxdomain,
            format!("{zone} does not exist"),
            format!("Domain {zone} does not exist"),
        ),
        LookupErrorKind::NoRecords => (
            DelegationStatus::NoNs,
            format!("{zone} has no nameservers"),
            format!("No NS records found for {zone}"),
        ),
        LookupErrorKind::Timeout => (
            DelegationStatus::Timeout,
            format!("Query for {zone} timed out"),
            format!("DNS query timeout for {zone}"),
        ),
        LookupErrorKind::NoNameservers => (
            DelegationStatus::NoNameservers,
            format!("No servers available for {zone}"),
            format!("No nameservers available for {zone}"),
        ),
        LookupErrorKind::Other => (
            DelegationStatus::Other,
            err.message.clone(),
            format!("Query error for {zone}: {}", err.message),
        ),
    }
}

/// Resolve A/AAAA for each nameserver and format a one-line summary.
///
/// Lookup failures and empty answers are silently skipped; a nameserver with
/// no reachable address simply contributes nothing.
async fn verbose_nameserver_info(resolver: &dyn Resolver, nameservers: &[String]) -> String {
    let mut entries = Vec::new();
    for ns in nameservers {
        for kind in [RecordKind::A, RecordKind::Aaaa] {
            let start = Instant::now();
            if let Ok(records) = resolver.resolve(ns, kind).await {
                if records.is_empty() {
                    continue;
                }
                // u128 -> u64: elapsed millis for a DNS query will never exceed u64::MAX
                #[allow(clippy::cast_possible_truncation)]
                let elapsed = start.elapsed().as_millis() as u64;
                entries.push(format!("{ns} {kind}: {} ({elapsed}ms)", records.join(", ")));
            }
        }
    }
    entries.join(" | ")
}

// ==================== tracer tests ====================
