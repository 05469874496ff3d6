//! Glue record validation across the delegation chain.
//!
//! Glue lives in the parent zone's referral, not in the child zone itself, so
//! every check here asks a parent-side server directly and compares what it
//! hands out against what the nameserver names actually resolve to.

use std::collections::{BTreeMap, HashSet};
use std::net::IpAddr;

use futures::{StreamExt, stream};

use crate::config::ROOT_BOOTSTRAP_SERVERS;
use crate::resolver::{LookupError, LookupErrorKind, RecordKind, Resolver};
use crate::types::{GlueRecordCheck, GlueReport, GlueStatus};

use super::chain::build_zone_chain;

/// Upper bound on zones inspected at the same time.
const MAX_CONCURRENT_ZONE_CHECKS: usize = 4;

/// Validate glue records for every zone in the delegation chain of `domain`.
///
/// The root is always reported as skipped; it has no parent to hand out glue.
pub(crate) async fn check_glue_records(
    resolver: &dyn Resolver,
    domain: &str,
) -> BTreeMap<String, GlueReport> {
    let chain = build_zone_chain(domain);
    let reports: Vec<GlueReport> = stream::iter(chain.iter().enumerate().map(|(i, zone)| {
        let parent_zone = (i > 0).then(|| chain[i - 1].as_str());
        check_zone(resolver, zone, parent_zone)
    }))
    .buffered(MAX_CONCURRENT_ZONE_CHECKS)
    .collect()
    .await;

    reports
        .into_iter()
        .map(|report| (report.zone.clone(), report))
        .collect()
}

async fn check_zone(
    resolver: &dyn Resolver,
    zone: &str,
    parent_zone: Option<&str>,
) -> GlueReport {
    let Some(parent_zone) = parent_zone else {
        return GlueReport {
            zone: zone.to_string(),
            parent_zone: None,
            status: GlueStatus::Skipped,
            message: None,
            nameservers: vec![],
            issues: vec![],
        };
    };

    let outcome = match resolver.resolve(zone, RecordKind::Ns).await {
        Ok(records) if records.is_empty() => Err(LookupError::new(
            LookupErrorKind::NoRecords,
            format!("no NS records for {zone}"),
        )),
        other => other,
    };

    match outcome {
        Ok(ns_list) => {
            let mut nameservers = Vec::with_capacity(ns_list.len());
            let mut issues = Vec::new();
            for ns in &ns_list {
                let check = check_nameserver(resolver, zone, parent_zone, ns).await;
                issues.extend(check.issues.iter().map(|issue| format!("{ns}: {issue}")));
                nameservers.push(check);
            }
            GlueReport {
                zone: zone.to_string(),
                parent_zone: Some(parent_zone.to_string()),
                status: GlueStatus::Success,
                message: None,
                nameservers,
                issues,
            }
        }
        Err(e) => {
            let (status, message) = match e.kind {
                LookupErrorKind::NxDomain => {
                    (GlueStatus::Nxdomain, format!("Zone {zone} does not exist"))
                }
                LookupErrorKind::NoRecords => {
                    (GlueStatus::NoNs, format!("No NS records found for {zone}"))
                }
                _ => (GlueStatus::Error, format!("Error querying {zone}: {e}")),
            };
            GlueReport {
                zone: zone.to_string(),
                parent_zone: Some(parent_zone.to_string()),
                status,
                message: Some(message.clone()),
                nameservers: vec![],
                issues: vec![message],
            }
        }
    }
}

/// Whether `ns` lies inside `zone` and therefore needs glue from the parent.
fn is_in_bailiwick(zone: &str, ns: &str) -> bool {
    zone != "." && (ns == zone || ns.ends_with(&format!(".{zone}")))
}

async fn check_nameserver(
    resolver: &dyn Resolver,
    zone: &str,
    parent_zone: &str,
    ns: &str,
) -> GlueRecordCheck {
    let mut check = GlueRecordCheck {
        nameserver: ns.to_string(),
        expected_glue: is_in_bailiwick(zone, ns),
        has_glue_a: false,
        has_glue_aaaa: false,
        glue_a_records: vec![],
        glue_aaaa_records: vec![],
        resolved_a_records: vec![],
        resolved_aaaa_records: vec![],
        glue_matches_resolution: true,
        issues: vec![],
    };

    collect_parent_glue(resolver, zone, parent_zone, ns, &mut check).await;

    // Independent resolution for comparison; failures just leave the lists empty.
    if let Ok(records) = resolver.resolve(ns, RecordKind::A).await {
        check.resolved_a_records = records;
    }
    if let Ok(records) = resolver.resolve(ns, RecordKind::Aaaa).await {
        check.resolved_aaaa_records = records;
    }

    if !check.glue_a_records.is_empty()
        && !check.resolved_a_records.is_empty()
        && !same_set(&check.glue_a_records, &check.resolved_a_records)
    {
        check.glue_matches_resolution = false;
        check
            .issues
            .push("Glue A records don't match resolved A records".to_string());
    }
    if !check.glue_aaaa_records.is_empty()
        && !check.resolved_aaaa_records.is_empty()
        && !same_set(&check.glue_aaaa_records, &check.resolved_aaaa_records)
    {
        check.glue_matches_resolution = false;
        check
            .issues
            .push("Glue AAAA records don't match resolved AAAA records".to_string());
    }

    if check.expected_glue {
        if !check.has_glue_a && !check.resolved_a_records.is_empty() {
            check
                .issues
                .push("Missing glue A records (expected for in-zone nameserver)".to_string());
        }
        if !check.has_glue_aaaa && !check.resolved_aaaa_records.is_empty() {
            check
                .issues
                .push("Missing glue AAAA records (expected for in-zone nameserver)".to_string());
        }
    } else if check.has_glue_a || check.has_glue_aaaa {
        check
            .issues
            .push("Unnecessary glue records (nameserver is out-of-zone)".to_string());
    }

    check
}

/// Ask the parent zone's servers for their referral and harvest additional
/// section records owned by `ns`.
///
/// Stops at the first parent server whose referral carries any glue for this
/// nameserver. Individual parent failures are skipped; only when no parent
/// could be queried at all does the failure surface as an issue.
async fn collect_parent_glue(
    resolver: &dyn Resolver,
    zone: &str,
    parent_zone: &str,
    ns: &str,
    check: &mut GlueRecordCheck,
) {
    let parent_ns_list: Vec<String> = if parent_zone == "." {
        ROOT_BOOTSTRAP_SERVERS
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        match resolver.resolve(parent_zone, RecordKind::Ns).await {
            Ok(list) => list,
            Err(e) => {
                check
                    .issues
                    .push(format!("Error checking glue records from parent zone: {e}"));
                return;
            }
        }
    };

    let mut queried_any = false;
    let mut last_error: Option<LookupError> = None;

    for parent_ns in &parent_ns_list {
        let ips = match resolver.resolve(parent_ns, RecordKind::A).await {
            Ok(ips) => ips,
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        };
        let Some(ip) = ips.first().and_then(|text| text.parse::<IpAddr>().ok()) else {
            continue;
        };

        match resolver.query_server(zone, RecordKind::Ns, ip).await {
            Ok(response) => {
                queried_any = true;
                for record in &response.additionals {
                    if !record.owner.eq_ignore_ascii_case(ns) {
                        continue;
                    }
                    match record.kind {
                        RecordKind::A => {
                            check.has_glue_a = true;
                            check.glue_a_records.push(record.value.clone());
                        }
                        RecordKind::Aaaa => {
                            check.has_glue_aaaa = true;
                            check.glue_aaaa_records.push(record.value.clone());
                        }
                        RecordKind::Ns => {}
                    }
                }
                if check.has_glue_a || check.has_glue_aaaa {
                    break;
                }
            }
            Err(e) => {
                last_error = Some(e);
            }
        }
    }

    if !queried_any {
        if let Some(e) = last_error {
            check
                .issues
                .push(format!("Error checking glue records from parent zone: {e}"));
        }
    }
}

fn same_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}

// ==================== glue tests ====================
