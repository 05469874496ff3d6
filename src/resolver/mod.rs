//! DNS lookup abstraction.
//!
//! All network I/O in the engine flows through the [`Resolver`] trait, so the
//! tracer, glue validator, and cross-reference checker can run against an
//! offline mock in tests. [`LiveResolver`] is the hickory-backed production
//! implementation.

mod live;
mod probe;

use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use live::LiveResolver;

/// Record types the engine queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    /// Name server record.
    Ns,
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ns => write!(f, "NS"),
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
        }
    }
}

/// Classified cause of a failed lookup.
///
/// A closed set: callers branch on the kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupErrorKind {
    /// The queried name does not exist.
    NxDomain,
    /// The name exists but has no records of the requested type.
    NoRecords,
    /// The query timed out.
    Timeout,
    /// Every upstream server failed to produce a usable answer.
    NoNameservers,
    /// Anything else.
    Other,
}

/// A failed lookup with its classified cause.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub message: String,
}

impl LookupError {
    #[must_use]
    pub fn new(kind: LookupErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(name: &str) -> Self {
        Self::new(LookupErrorKind::Timeout, format!("query for {name} timed out"))
    }

    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Other, message)
    }
}

/// One decoded resource record from a raw DNS response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecord {
    /// Owner name, lowercased without the trailing dot.
    pub owner: String,
    pub kind: RecordKind,
    /// Record value: a hostname (NS) or address text (A/AAAA).
    pub value: String,
}

impl WireRecord {
    #[must_use]
    pub fn new(owner: impl Into<String>, kind: RecordKind, value: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            kind,
            value: value.into(),
        }
    }
}

/// Sections of a raw DNS response.
///
/// Only NS, A, and AAAA records survive decoding; everything else is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub answers: Vec<WireRecord>,
    pub authority: Vec<WireRecord>,
    pub additionals: Vec<WireRecord>,
}

/// DNS lookup seam used by every diagnostic component.
///
/// Implementations must normalize hostnames in results: lowercase, trailing
/// root dot removed. Address values use their canonical textual form.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Recursive lookup of `kind` records for `name`.
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, LookupError>;

    /// Non-recursive query for `name` sent directly to `server`.
    ///
    /// Used to inspect referral responses: glue validation reads the
    /// additional section, cross-referencing reads answer and authority.
    async fn query_server(
        &self,
        name: &str,
        kind: RecordKind,
        server: IpAddr,
    ) -> Result<RawResponse, LookupError>;

    /// Human-readable label of the upstream in use, recorded in reports.
    fn describe(&self) -> String;
}

// ==================== vocabulary tests ====================
