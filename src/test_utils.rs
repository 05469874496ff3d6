//! Test helpers.
//!
//! Provides an offline [`MockResolver`] so every diagnostic component can be
//! exercised without touching the network.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::resolver::{
    LookupError, LookupErrorKind, RawResponse, RecordKind, Resolver, WireRecord,
};

// ===== MockResolver =====

/// Scripted resolver: answers come from maps keyed by query name.
///
/// Unscripted queries fail with [`LookupErrorKind::Other`] and a message
/// naming the query, so a miswired test fails loudly instead of passing on
/// accidental defaults.
pub struct MockResolver {
    records: HashMap<(String, RecordKind), Result<Vec<String>, LookupError>>,
    raw: HashMap<(String, IpAddr), RawResponse>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            raw: HashMap::new(),
        }
    }

    /// Script a successful `resolve` answer.
    #[must_use]
    pub fn with_records(mut self, name: &str, kind: RecordKind, values: &[&str]) -> Self {
        self.records.insert(
            (name.to_string(), kind),
            Ok(values.iter().map(ToString::to_string).collect()),
        );
        self
    }

    /// Script a failed `resolve` answer of the given kind.
    #[must_use]
    pub fn with_failure(mut self, name: &str, kind: RecordKind, error: LookupErrorKind) -> Self {
        self.records.insert(
            (name.to_string(), kind),
            Err(LookupError::new(
                error,
                format!("mock failure for {name} {kind}"),
            )),
        );
        self
    }

    /// Script a raw `query_server` response for `(name, server)`.
    #[must_use]
    pub fn with_raw(mut self, name: &str, server: &str, response: RawResponse) -> Self {
        let server: IpAddr = server.parse().unwrap();
        self.raw.insert((name.to_string(), server), response);
        self
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, LookupError> {
        self.records
            .get(&(name.to_string(), kind))
            .cloned()
            .unwrap_or_else(|| {
                Err(LookupError::new(
                    LookupErrorKind::Other,
                    format!("no mock entry for {name} {kind}"),
                ))
            })
    }

    async fn query_server(
        &self,
        name: &str,
        kind: RecordKind,
        server: IpAddr,
    ) -> Result<RawResponse, LookupError> {
        let _ = kind;
        self.raw
            .get(&(name.to_string(), server))
            .cloned()
            .ok_or_else(|| {
                LookupError::new(
                    LookupErrorKind::Other,
                    format!("no mock raw response for {name} @ {server}"),
                )
            })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

// ===== Response builders =====

/// Referral-style raw response carrying glue in the additional section.
pub fn make_referral(zone: &str, ns_names: &[&str], glue: &[(&str, RecordKind, &str)]) -> RawResponse {
    RawResponse {
        answers: vec![],
        authority: ns_names
            .iter()
            .map(|ns| WireRecord::new(zone, RecordKind::Ns, *ns))
            .collect(),
        additionals: glue
            .iter()
            .map(|(owner, kind, value)| WireRecord::new(*owner, *kind, *value))
            .collect(),
    }
}

/// Authoritative-style raw response answering an NS query directly.
pub fn make_ns_answer(zone: &str, ns_names: &[&str]) -> RawResponse {
    RawResponse {
        answers: ns_names
            .iter()
            .map(|ns| WireRecord::new(zone, RecordKind::Ns, *ns))
            .collect(),
        authority: vec![],
        additionals: vec![],
    }
}
