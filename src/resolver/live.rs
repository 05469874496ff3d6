//! Production resolver backed by hickory.

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::{
    ResolveError, TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::{ProtoErrorKind, op::ResponseCode},
};
use tokio::time::timeout;

use super::probe;
use super::{LookupError, LookupErrorKind, RawResponse, RecordKind, Resolver};
use crate::config::DelverConfig;

/// Hickory-backed [`Resolver`].
///
/// The upstream configuration is resolved once at construction; each lookup
/// then builds a fresh resolver from it, so no records are ever cached across
/// queries and a rerun observes the network as it is.
pub struct LiveResolver {
    base: ResolverConfig,
    query_timeout: std::time::Duration,
    lifetime: std::time::Duration,
    label: String,
}

impl LiveResolver {
    /// Build from an engine configuration.
    ///
    /// With no upstream override, the host system configuration is used; if it
    /// cannot be read, hickory's default upstream set stands in.
    #[must_use]
    pub fn new(config: &DelverConfig) -> Self {
        let (base, label) = match config.upstream {
            Some(ip) => {
                let base = ResolverConfig::from_parts(
                    None,
                    vec![],
                    NameServerConfigGroup::from_ips_clear(&[ip], 53, true),
                );
                (base, ip.to_string())
            }
            None => system_config(),
        };
        Self {
            base,
            query_timeout: config.query_timeout,
            lifetime: config.lifetime,
            label,
        }
    }

    fn build(&self) -> TokioResolver {
        let mut opts = ResolverOpts::default();
        opts.timeout = self.query_timeout;
        // One retry after the first try keeps the total near `lifetime`.
        opts.attempts = 1;
        let provider = TokioConnectionProvider::default();
        TokioResolver::builder_with_config(self.base.clone(), provider)
            .with_options(opts)
            .build()
    }

    async fn lookup(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, ResolveError> {
        let resolver = self.build();
        match kind {
            RecordKind::Ns => {
                let response = resolver.ns_lookup(name).await?;
                Ok(response
                    .iter()
                    .map(|ns| ns.0.to_string().trim_end_matches('.').to_lowercase())
                    .collect())
            }
            RecordKind::A => {
                let response = resolver.ipv4_lookup(name).await?;
                Ok(response.iter().map(|ip| ip.to_string()).collect())
            }
            RecordKind::Aaaa => {
                let response = resolver.ipv6_lookup(name).await?;
                Ok(response.iter().map(|ip| ip.to_string()).collect())
            }
        }
    }
}

#[async_trait]
impl Resolver for LiveResolver {
    async fn resolve(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, LookupError> {
        match timeout(self.lifetime, self.lookup(name, kind)).await {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(e)) => Err(LookupError::new(classify(&e), e.to_string())),
            Err(_) => Err(LookupError::timeout(name)),
        }
    }

    async fn query_server(
        &self,
        name: &str,
        kind: RecordKind,
        server: IpAddr,
    ) -> Result<RawResponse, LookupError> {
        probe::query_server(name, kind, server, self.query_timeout).await
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Host system resolver configuration plus a display label, with fallback.
fn system_config() -> (ResolverConfig, String) {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, _opts)) => {
                let label = join_ips(&config);
                return (config, label);
            }
            Err(e) => {
                log::warn!("Failed to load system DNS configuration, falling back to defaults: {e}");
            }
        }
    }

    let fallback = ResolverConfig::default();
    let label = join_ips(&fallback);
    (fallback, label)
}

/// Deduplicated nameserver IPs of a configuration, joined for display.
fn join_ips(config: &ResolverConfig) -> String {
    let mut ips: Vec<String> = Vec::new();
    for ns in config.name_servers() {
        let ip = ns.socket_addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    if ips.is_empty() {
        "Default".to_string()
    } else {
        ips.join(", ")
    }
}

/// Map a hickory failure onto the engine's closed error taxonomy.
fn classify(err: &ResolveError) -> LookupErrorKind {
    if err.is_nx_domain() {
        return LookupErrorKind::NxDomain;
    }
    if let Some(proto) = err.proto() {
        match proto.kind() {
            ProtoErrorKind::NoRecordsFound { response_code, .. } => {
                return match *response_code {
                    // All upstreams failing to serve the zone surfaces as
                    // SERVFAIL/REFUSED rather than a distinct error here.
                    ResponseCode::ServFail | ResponseCode::Refused => {
                        LookupErrorKind::NoNameservers
                    }
                    _ => LookupErrorKind::NoRecords,
                };
            }
            ProtoErrorKind::Timeout => return LookupErrorKind::Timeout,
            _ => {}
        }
    }
    if err.is_no_records_found() {
        return LookupErrorKind::NoRecords;
    }
    LookupErrorKind::Other
}

// ==================== LiveResolver tests ====================
