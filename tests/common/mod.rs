//! Shared scripted resolver for offline integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use dns_delver::{LookupError, LookupErrorKind, RawResponse, RecordKind, Resolver, WireRecord};

/// Offline resolver answering from a scripted table.
///
/// Unscripted lookups fail with an `OTHER` error, so a test only sees the
/// answers it set up explicitly.
#[derive(Default)]
pub struct ScriptedResolver {
    records: HashMap<(String, RecordKind), Result<Vec<String>, LookupError>>,
    raw: HashMap<(String, IpAddr), RawResponse>,
}

impl ScriptedResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(mut self, name: &str, kind: RecordKind, values: &[&str]) -> Self {
        self.records.insert(
            (name.to_string(), kind),
            Ok(values.iter().map(ToString::to_string).collect()),
        );
        self
    }

    #[must_use]
    pub fn with_failure(
        mut self,
        name: &str,
        kind: RecordKind,
        error_kind: LookupErrorKind,
    ) -> Self {
        self.records.insert(
            (name.to_string(), kind),
            Err(LookupError::new(
                error_kind,
                format!("scripted failure for {name} {kind}"),
            )),
        );
        self
    }

    #[must_use]
    pub fn with_raw(mut self, name: &str, server: &str, response: RawResponse) -> Self {
        self.raw
            .insert((name.to_string(), server.parse().unwrap()), response);
        self
    }
}

#[async_trait]
impl Resolver for ScriptedResolver {
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, LookupError> {
        self.records
            .get(&(name.to_string(), kind))
            .cloned()
            .unwrap_or_else(|| {
                Err(LookupError::other(format!(
                    "no script entry for {name} {kind}"
                )))
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
            .ok_or_else(|| LookupError::other(format!("no script entry for {name} @ {server}")))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Referral response: the NS set in the authority section, optional glue in
/// the additional section.
pub fn referral(zone: &str, ns_names: &[&str], glue: &[(&str, RecordKind, &str)]) -> RawResponse {
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

/// Authoritative answer carrying the NS set in the answer section.
pub fn ns_answer(zone: &str, ns_names: &[&str]) -> RawResponse {
    RawResponse {
        answers: ns_names
            .iter()
            .map(|ns| WireRecord::new(zone, RecordKind::Ns, *ns))
            .collect(),
        authority: vec![],
        additionals: vec![],
    }
}
