//! Public types returned by delegation diagnostics.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the NS query for one zone in the delegation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegationStatus {
    /// The zone answered with at least one NS record.
    Ok,
    /// The zone does not exist.
    Nxdomain,
    /// The zone exists but returned no NS records.
    NoNs,
    /// The query timed out.
    Timeout,
    /// No upstream nameserver produced a usable answer.
    NoNameservers,
    /// Any other resolution failure.
    Other,
}

impl DelegationStatus {
    /// Whether this status denies further descent unconditionally.
    ///
    /// [`Other`](Self::Other) is not definitive: near the top of the chain it
    /// is treated as a transient hiccup and the walk continues.
    #[must_use]
    pub fn is_definitive_failure(self) -> bool {
        matches!(
            self,
            Self::Nxdomain | Self::NoNs | Self::Timeout | Self::NoNameservers
        )
    }
}

impl fmt::Display for DelegationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Nxdomain => write!(f, "NXDOMAIN"),
            Self::NoNs => write!(f, "NO_NS"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::NoNameservers => write!(f, "NO_NAMESERVERS"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// One zone visited by the delegation tracer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceNode {
    /// Zone name (`"."` for the root).
    pub zone: String,
    /// NS hostnames, lowercased without the trailing dot. Empty unless
    /// `status` is [`DelegationStatus::Ok`].
    pub nameservers: Vec<String>,
    /// Outcome of the NS query for this zone.
    pub status: DelegationStatus,
    /// Human-readable failure detail when `status` is not `Ok`.
    pub error: Option<String>,
    /// Per-nameserver A/AAAA summary, present only on verbose traces.
    pub verbose_info: Option<String>,
    /// NS query duration in milliseconds.
    pub response_time_ms: u64,
    /// Whether the NS query exceeded the slow threshold.
    pub is_slow: bool,
    /// Whether the walk ended at this node before reaching the full domain.
    pub trace_stopped: bool,
}

/// Timing summary for one visited zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneTiming {
    pub response_time_ms: u64,
    pub is_slow: bool,
    pub status: DelegationStatus,
}

/// Result of walking the delegation chain for a domain.
///
/// `chain` is truncated to the zones actually visited, so it always has the
/// same length as `nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationTrace {
    pub domain: String,
    pub chain: Vec<String>,
    pub nodes: Vec<TraceNode>,
    pub timing: BTreeMap<String, ZoneTiming>,
}

/// Outcome of the glue inspection for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlueStatus {
    /// Zone was not checked (the root has no parent).
    Skipped,
    /// NS records resolved and every nameserver was inspected.
    Success,
    /// The zone does not exist.
    Nxdomain,
    /// The zone returned no NS records.
    NoNs,
    /// The NS query failed for another reason.
    Error,
}

/// Glue findings for a single nameserver of a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlueRecordCheck {
    /// The nameserver under inspection.
    pub nameserver: String,
    /// Whether glue is required (the nameserver lies inside the zone).
    pub expected_glue: bool,
    pub has_glue_a: bool,
    pub has_glue_aaaa: bool,
    /// A records found in a parent referral's additional section.
    pub glue_a_records: Vec<String>,
    /// AAAA records found in a parent referral's additional section.
    pub glue_aaaa_records: Vec<String>,
    /// A records resolved independently through the recursive resolver.
    pub resolved_a_records: Vec<String>,
    /// AAAA records resolved independently through the recursive resolver.
    pub resolved_aaaa_records: Vec<String>,
    /// False when glue and resolution disagree for either address family.
    pub glue_matches_resolution: bool,
    /// Issues for this nameserver, in detection order.
    pub issues: Vec<String>,
}

/// Glue report for one zone of the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlueReport {
    pub zone: String,
    /// The delegating parent zone; `None` for the root.
    pub parent_zone: Option<String>,
    pub status: GlueStatus,
    /// Failure detail when `status` is `nxdomain`, `no_ns`, or `error`.
    pub message: Option<String>,
    /// Per-nameserver findings; empty unless `status` is `success`.
    pub nameservers: Vec<GlueRecordCheck>,
    /// Zone-level issue strings (`"{ns}: {issue}"` plus any query failures).
    pub issues: Vec<String>,
}

/// What one terminal nameserver says about the domain's NS set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossRefEntry {
    /// NS names this server returned (answer + authority), sorted, no
    /// trailing dots.
    pub references: Vec<String>,
    /// Whether the server lists itself among the references.
    pub self_reference: bool,
    /// References that point back at this server from their own entries.
    pub mutual_references: Vec<String>,
    /// Failure detail when the server could not be queried.
    pub error: Option<String>,
}

/// Aggregate delegation health score with an itemized breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// Final score, capped at `max_score`, one decimal place.
    pub score: f64,
    pub max_score: f64,
    /// Ordered add/deduct lines explaining the score.
    pub breakdown: Vec<String>,
    pub percentage: f64,
}

/// A/AAAA records for a single nameserver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameserverInfo {
    pub a_records: Vec<String>,
    pub aaaa_records: Vec<String>,
}

/// Nameserver listing for a domain together with resolved addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameserverOverview {
    pub domain: String,
    pub nameservers: Vec<String>,
    /// Address records per nameserver; lookup failures leave the lists empty.
    pub nameserver_info: BTreeMap<String, NameserverInfo>,
    /// Label of the upstream resolver that served the run.
    pub dns_server_used: String,
}

/// Per-domain summary produced by multi-domain comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainComparison {
    pub trace: Vec<TraceNode>,
    /// Sum of NS query times across all visited zones.
    pub total_response_time_ms: u64,
    /// Number of zones flagged slow.
    pub slow_responses: usize,
    /// Total nameservers seen across all visited zones.
    pub nameserver_count: usize,
    /// Set instead of a trace when the domain failed validation.
    pub error: Option<String>,
}

/// Aggregate result of a multi-domain comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// Per-domain summaries keyed by domain.
    pub results: BTreeMap<String, DomainComparison>,
    /// Label of the upstream resolver that served the run.
    pub dns_server_used: String,
    pub timestamp: DateTime<Utc>,
    pub total_domains: usize,
    /// Domains that passed validation and produced a trace.
    pub successful_domains: usize,
}

/// Options for a full [`analyze`](crate::DelegationService::analyze) run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Attach per-nameserver A/AAAA info to trace nodes.
    pub verbose: bool,
    /// Run the glue validator over the chain.
    pub check_glue: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            check_glue: true,
        }
    }
}

/// Complete diagnostic report for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationReport {
    pub domain: String,
    /// Label of the upstream resolver that served the run.
    pub dns_server_used: String,
    pub timestamp: DateTime<Utc>,
    pub chain: Vec<String>,
    pub trace: Vec<TraceNode>,
    pub timing: BTreeMap<String, ZoneTiming>,
    pub glue: BTreeMap<String, GlueReport>,
    pub cross_references: BTreeMap<String, CrossRefEntry>,
    pub health: HealthScore,
}

// ==================== serde tests ====================
