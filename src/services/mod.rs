//! Delegation diagnostic services behind a single façade.
//!
//! [`DelegationService`] owns the resolver and configuration; every check is a
//! method on it. The pure helpers [`build_zone_chain`] and [`health_score`]
//! are exposed directly for callers that bring their own data.

mod chain;
mod cross_ref;
mod glue;
mod report;
mod score;
mod trace;

pub use chain::build_zone_chain;
pub use score::health_score;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::DelverConfig;
use crate::error::{DelverError, DelverResult};
use crate::resolver::{LiveResolver, Resolver};
use crate::types::{
    AnalysisOptions, ComparisonReport, CrossRefEntry, DelegationReport, DelegationTrace,
    GlueReport, NameserverOverview,
};

/// Largest batch accepted by [`DelegationService::compare`].
const MAX_COMPARE_DOMAINS: usize = 10;

/// Validate and normalise a domain name input.
///
/// Trims whitespace and a trailing root dot, converts internationalised
/// domain names (IDN) to ASCII via IDNA 2008, and rejects empty, overlong,
/// or address-literal inputs. Delegation is traced for names, never for IPs.
fn validate_domain(domain: &str) -> DelverResult<String> {
    let domain = domain.trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err(DelverError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    if domain.parse::<std::net::IpAddr>().is_ok() {
        return Err(DelverError::ValidationError(format!(
            "Invalid domain format: {domain}"
        )));
    }
    // IDNA processing: converts Unicode labels to Punycode and validates.
    let ascii_domain = idna::domain_to_ascii_strict(domain)
        .map_err(|_| DelverError::ValidationError(format!("Invalid domain format: {domain}")))?;
    if ascii_domain.len() > 253 {
        return Err(DelverError::ValidationError(format!(
            "Domain name exceeds maximum length of 253 characters (got {})",
            ascii_domain.len()
        )));
    }
    Ok(ascii_domain)
}

/// Entry point for delegation diagnostics.
///
/// ```rust,no_run
/// use dns_delver::{AnalysisOptions, DelegationService, DelverConfig};
/// # async fn demo() -> dns_delver::DelverResult<()> {
/// let service = DelegationService::new(DelverConfig::default());
/// let report = service.analyze("example.com", &AnalysisOptions::default()).await?;
/// println!("{}/{}", report.health.score, report.health.max_score);
/// # Ok(())
/// # }
/// ```
pub struct DelegationService {
    resolver: Arc<dyn Resolver>,
    config: DelverConfig,
}

impl DelegationService {
    /// Create a service backed by a live resolver built from `config`.
    #[must_use]
    pub fn new(config: DelverConfig) -> Self {
        let resolver = Arc::new(LiveResolver::new(&config));
        Self { resolver, config }
    }

    /// Create a service over a caller-supplied resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn Resolver>, config: DelverConfig) -> Self {
        Self { resolver, config }
    }

    /// Walk the delegation chain for `domain` from the root down.
    ///
    /// With `verbose` set, each successful node also carries resolved
    /// addresses for its nameservers.
    pub async fn trace(&self, domain: &str, verbose: bool) -> DelverResult<DelegationTrace> {
        let domain = validate_domain(domain)?;
        Ok(trace::trace_delegation(self.resolver.as_ref(), &self.config, &domain, verbose).await)
    }

    /// Validate glue records for every zone in `domain`'s delegation chain.
    pub async fn check_glue(&self, domain: &str) -> DelverResult<BTreeMap<String, GlueReport>> {
        let domain = validate_domain(domain)?;
        Ok(glue::check_glue_records(self.resolver.as_ref(), &domain).await)
    }

    /// Ask each of `nameservers` directly for its view of `domain`'s NS set.
    pub async fn cross_reference(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> DelverResult<BTreeMap<String, CrossRefEntry>> {
        let domain = validate_domain(domain)?;
        Ok(cross_ref::cross_reference(self.resolver.as_ref(), &domain, nameservers).await)
    }

    /// Run trace, glue validation, cross-reference, and scoring in one pass.
    pub async fn analyze(
        &self,
        domain: &str,
        options: &AnalysisOptions,
    ) -> DelverResult<DelegationReport> {
        let domain = validate_domain(domain)?;
        log::info!("Received delegation request for domain: {domain}");
        Ok(report::analyze(self.resolver.as_ref(), &self.config, &domain, options).await)
    }

    /// Trace up to [`MAX_COMPARE_DOMAINS`] domains and summarize them side by
    /// side.
    pub async fn compare(&self, domains: &[String]) -> DelverResult<ComparisonReport> {
        if domains.is_empty() {
            return Err(DelverError::ValidationError(
                "Domains list is required".to_string(),
            ));
        }
        if domains.len() > MAX_COMPARE_DOMAINS {
            return Err(DelverError::ValidationError(format!(
                "Maximum {MAX_COMPARE_DOMAINS} domains allowed for comparison"
            )));
        }
        log::info!("Received comparison request for domains: {}", domains.join(", "));
        Ok(report::compare(self.resolver.as_ref(), &self.config, domains).await)
    }

    /// List `domain`'s nameservers together with their A/AAAA records.
    pub async fn nameserver_overview(&self, domain: &str) -> DelverResult<NameserverOverview> {
        let domain = validate_domain(domain)?;
        report::nameserver_overview(self.resolver.as_ref(), &domain).await
    }
}

// ==================== service façade tests ====================
