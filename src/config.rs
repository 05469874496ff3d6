//! Immutable engine configuration.

use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DelverError, DelverResult};

/// Upstream resolvers callers may select, plus the `system` pseudo-entry.
pub const ALLOWED_UPSTREAMS: &[&str] = &[
    "system",
    "8.8.8.8",
    "8.8.4.4",
    "1.1.1.1",
    "1.0.0.1",
    "9.9.9.9",
    "208.67.222.222",
    "208.67.220.220",
];

/// Root nameservers used to bootstrap parent-side glue queries when the
/// parent zone is the root itself.
pub const ROOT_BOOTSTRAP_SERVERS: &[&str] = &[
    "a.root-servers.net",
    "b.root-servers.net",
    "c.root-servers.net",
];

/// Scoring weights for [`HealthScore`](crate::HealthScore) calculation.
///
/// The total achievable score is capped at 10 regardless of how the weights
/// sum up; deeper delegation chains simply saturate earlier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    /// Weight of the root layer (chain index 0).
    pub root: f64,
    /// Weight of the TLD layer (chain index 1).
    pub tld: f64,
    /// Weight of every deeper delegation layer.
    pub domain: f64,
    /// Weight of the glue record category.
    pub glue: f64,
    /// Weight of the cross-reference category.
    pub cross_ref: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            root: 1.0,
            tld: 1.0,
            domain: 3.0,
            glue: 3.0,
            cross_ref: 2.0,
        }
    }
}

/// Immutable configuration passed to [`DelegationService`](crate::DelegationService).
///
/// Construct once, share freely; nothing here changes after creation.
#[derive(Debug, Clone)]
pub struct DelverConfig {
    /// Upstream resolver IP, or `None` for the host system configuration.
    pub upstream: Option<IpAddr>,
    /// Per-try timeout for every DNS query, recursive or raw.
    pub query_timeout: Duration,
    /// Approximate total lifetime of a recursive lookup across retries.
    pub lifetime: Duration,
    /// NS responses slower than this many milliseconds are flagged slow.
    pub slow_threshold_ms: u64,
    /// Health score weighting policy.
    pub weights: ScoreWeights,
}

impl Default for DelverConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            query_timeout: Duration::from_secs(2),
            lifetime: Duration::from_secs(4),
            slow_threshold_ms: 2000,
            weights: ScoreWeights::default(),
        }
    }
}

impl DelverConfig {
    /// Build a configuration targeting a specific upstream resolver.
    #[must_use]
    pub fn with_upstream(upstream: IpAddr) -> Self {
        Self {
            upstream: Some(upstream),
            ..Self::default()
        }
    }
}

/// Map a caller-supplied upstream label to a resolver target.
///
/// `"system"` (or the empty string) selects the host configuration; any other
/// value must be an IP address from [`ALLOWED_UPSTREAMS`].
pub fn resolve_upstream(server: &str) -> DelverResult<Option<IpAddr>> {
    let server = server.trim();
    if server.is_empty() || server == "system" {
        return Ok(None);
    }
    if !ALLOWED_UPSTREAMS.contains(&server) {
        return Err(DelverError::ValidationError(format!(
            "DNS server not allowed: {server}"
        )));
    }
    let ip: IpAddr = server.parse().map_err(|_| {
        DelverError::ValidationError(format!("Invalid DNS server address: {server}"))
    })?;
    Ok(Some(ip))
}

// ==================== Config tests ====================
