//! Delegation chain construction.

/// Build the zone chain from the root down to `domain`.
///
/// Every label boundary becomes a chain entry; there is no public-suffix
/// handling, so `example.co.uk` is walked as `.` → `uk` → `co.uk` →
/// `example.co.uk`.
#[must_use]
pub fn build_zone_chain(domain: &str) -> Vec<String> {
    let mut chain = vec![".".to_string()];
    let trimmed = domain.trim_matches('.');
    if trimmed.is_empty() {
        return chain;
    }
    let labels: Vec<&str> = trimmed.split('.').filter(|label| !label.is_empty()).collect();
    for i in (0..labels.len()).rev() {
        chain.push(labels[i..].join("."));
    }
    chain
}

// ==================== chain tests ====================
