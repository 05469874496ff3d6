//! DNS delegation diagnostics: tracing, glue validation, and health scoring.
//!
//! Walks a domain's delegation chain from the root down, inspects parent-side
//! glue records at the protocol level, asks every terminal nameserver for its
//! own view of the domain's NS set, and condenses the findings into a
//! weighted 0-10 health score with a textual breakdown.
//!
//! All network access goes through the [`Resolver`] trait, so the whole
//! pipeline can be exercised offline with a scripted implementation.

mod config;
mod error;
mod resolver;
mod services;
mod types;

#[cfg(test)]
mod test_utils;

pub use config::{
    ALLOWED_UPSTREAMS, DelverConfig, ROOT_BOOTSTRAP_SERVERS, ScoreWeights, resolve_upstream,
};
pub use error::{DelverError, DelverResult};
pub use resolver::{
    LiveResolver, LookupError, LookupErrorKind, RawResponse, RecordKind, Resolver, WireRecord,
};
pub use services::{DelegationService, build_zone_chain, health_score};
pub use types::{
    AnalysisOptions, ComparisonReport, CrossRefEntry, DelegationReport, DelegationStatus,
    DelegationTrace, DomainComparison, GlueRecordCheck, GlueReport, GlueStatus, HealthScore,
    NameserverInfo, NameserverOverview, TraceNode, ZoneTiming,
};
