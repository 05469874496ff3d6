//! Cross-reference check for the terminal delegation level.
//!
//! Each authoritative nameserver is asked directly which servers it believes
//! serve the domain. Comparing those answers against each other exposes
//! configuration drift: servers that omit themselves, servers the rest of the
//! set no longer acknowledges, and servers that are plain unreachable.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::IpAddr;

use futures::{StreamExt, stream};

use crate::resolver::{LookupError, LookupErrorKind, RecordKind, Resolver};
use crate::types::CrossRefEntry;

/// Upper bound on nameservers interrogated at the same time.
const MAX_CONCURRENT_NS_QUERIES: usize = 4;

/// Ask every nameserver in `nameservers` for its own NS view of `domain` and
/// correlate the answers.
///
/// A nameserver that cannot be resolved or queried gets an entry with an
/// `error` set and an empty reference list; the rest of the set is still
/// processed.
pub(crate) async fn cross_reference(
    resolver: &dyn Resolver,
    domain: &str,
    nameservers: &[String],
) -> BTreeMap<String, CrossRefEntry> {
    let gathered: Vec<(String, Result<Vec<String>, LookupError>)> =
        stream::iter(nameservers.iter().map(|ns| async move {
            let outcome = gather_references(resolver, domain, ns).await;
            if let Err(e) = &outcome {
                log::warn!("Error querying nameserver {ns} for {domain}: {e}");
            }
            (ns.clone(), outcome)
        }))
        .buffered(MAX_CONCURRENT_NS_QUERIES)
        .collect()
        .await;

    let reference_map: HashMap<&str, &Vec<String>> = gathered
        .iter()
        .filter_map(|(ns, outcome)| outcome.as_ref().ok().map(|refs| (ns.as_str(), refs)))
        .collect();

    let mut results = BTreeMap::new();
    for (ns, outcome) in &gathered {
        let entry = match outcome {
            Ok(references) => CrossRefEntry {
                references: references.clone(),
                self_reference: references.iter().any(|r| r == ns),
                mutual_references: references
                    .iter()
                    .filter(|r| {
                        nameservers.contains(r)
                            && reference_map
                                .get(r.as_str())
                                .is_some_and(|other| other.contains(ns))
                    })
                    .cloned()
                    .collect(),
                error: None,
            },
            Err(e) => CrossRefEntry {
                references: vec![],
                self_reference: false,
                mutual_references: vec![],
                error: Some(e.to_string()),
            },
        };
        results.insert(ns.clone(), entry);
    }
    results
}

/// Resolve `ns` to an address and ask it directly for the domain's NS set.
///
/// References are read from both the answer and authority sections so that
/// servers responding with a delegation instead of an authoritative answer
/// still count.
async fn gather_references(
    resolver: &dyn Resolver,
    domain: &str,
    ns: &str,
) -> Result<Vec<String>, LookupError> {
    let ips = resolver.resolve(ns, RecordKind::A).await?;
    let ip = ips
        .first()
        .and_then(|text| text.parse::<IpAddr>().ok())
        .ok_or_else(|| {
            LookupError::new(
                LookupErrorKind::NoRecords,
                format!("no A records for {ns}"),
            )
        })?;

    let response = resolver.query_server(domain, RecordKind::Ns, ip).await?;
    let mut references = BTreeSet::new();
    for record in response.answers.iter().chain(response.authority.iter()) {
        if record.kind == RecordKind::Ns {
            references.insert(record.value.trim_end_matches('.').to_ascii_lowercase());
        }
    }
    Ok(references.into_iter().collect())
}

// ==================== cross-reference tests ====================
