//! Unified error types for the delegation engine.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by [`DelegationService`](crate::DelegationService) entry points.
///
/// Diagnostic failures (unreachable nameservers, NXDOMAIN zones, timeouts) are
/// never represented here; they are encoded in the returned data so partial
/// results survive. Only malformed input and resolver construction problems
/// become hard errors.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum DelverError {
    /// Input validation failed (bad domain, unknown upstream server).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Network-level failure outside the per-query soft-failure model.
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result alias used across the crate.
pub type DelverResult<T> = std::result::Result<T, DelverError>;
