//! Weighted health scoring over trace, glue, and cross-reference results.
//!
//! The score is a pure function of its inputs. Callers get both the numeric
//! total and an ordered textual breakdown; the breakdown is part of the
//! contract, it is what users actually read.

use std::collections::BTreeMap;

use crate::config::ScoreWeights;
use crate::types::{CrossRefEntry, DelegationStatus, GlueReport, HealthScore, TraceNode};

/// How many broken-nameserver details the breakdown lists before truncating.
const MAX_BROKEN_DETAILS: usize = 3;

/// Compute the 0-10 health score for a completed diagnosis.
///
/// Per trace layer, 70% of the layer weight rewards a clean NS answer and 30%
/// rewards a fast one. Glue and cross-reference contributions start at their
/// full weight and lose 1.0 per major finding and 0.25 per minor one, floored
/// at zero. Empty glue or cross-reference maps leave their section out
/// entirely, capping the attainable total.
#[must_use]
pub fn health_score(
    nodes: &[TraceNode],
    glue: &BTreeMap<String, GlueReport>,
    cross_ref: &BTreeMap<String, CrossRefEntry>,
    weights: &ScoreWeights,
) -> HealthScore {
    let mut score = 0.0_f64;
    let mut breakdown = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        let layer_weight = match i {
            0 => weights.root,
            1 => weights.tld,
            _ => weights.domain,
        };
        let layer = i + 1;
        let zone = &node.zone;
        let mut layer_score = 0.0_f64;

        if node.status == DelegationStatus::Ok {
            layer_score += 0.7 * layer_weight;
            let points = fmt_points(0.7 * layer_weight);
            breakdown.push(format!("+{points} points: Layer {layer} ({zone}) is healthy"));
        } else {
            breakdown.push(format!("+0 points: Layer {layer} ({zone}) has errors"));
        }

        if node.is_slow {
            breakdown.push(format!("+0 points: Layer {layer} ({zone}) has slow response"));
        } else {
            layer_score += 0.3 * layer_weight;
            let points = fmt_points(0.3 * layer_weight);
            breakdown.push(format!(
                "+{points} points: Layer {layer} ({zone}) has good response time"
            ));
        }

        score += layer_score;
    }

    if !glue.is_empty() {
        let mut major_issues: u32 = 0;
        let mut minor_issues: u32 = 0;
        for report in glue.values() {
            for issue in &report.issues {
                if issue.contains("Missing glue") || issue.contains("don't match") {
                    major_issues += 1;
                } else if !issue.contains("Unnecessary glue") {
                    minor_issues += 1;
                }
            }
        }

        if major_issues == 0 && minor_issues == 0 {
            score += weights.glue;
            let points = fmt_points(weights.glue);
            breakdown.push(format!("+{points} points: All glue records are correct"));
        } else {
            let deduction = f64::from(major_issues) * 1.0 + f64::from(minor_issues) * 0.25;
            score += (weights.glue - deduction).max(0.0);

            if major_issues > 0 {
                let issue_text = if major_issues == 1 { "issue" } else { "issues" };
                let points = fmt_points(f64::from(major_issues) * 1.0);
                breakdown.push(format!(
                    "-{points} points: {major_issues} major glue {issue_text} found"
                ));
            }
            if minor_issues > 0 {
                let issue_text = if minor_issues == 1 { "issue" } else { "issues" };
                let points = fmt_points(f64::from(minor_issues) * 0.25);
                breakdown.push(format!(
                    "-{points} points: {minor_issues} minor glue {issue_text} found"
                ));
            }
        }
    }

    if !cross_ref.is_empty() {
        let mut broken: u32 = 0;
        let mut inconsistencies: u32 = 0;
        let mut broken_details = Vec::new();

        for (ns, entry) in cross_ref {
            if let Some(error) = &entry.error {
                broken += 1;
                broken_details.push(format!("{ns}: {error}"));
            }
            if !entry.references.is_empty() && !entry.self_reference {
                inconsistencies += 1;
            }
        }

        if broken == 0 && inconsistencies == 0 {
            score += weights.cross_ref;
            let points = fmt_points(weights.cross_ref);
            breakdown.push(format!(
                "+{points} points: All nameserver references are consistent"
            ));
        } else {
            let deduction = f64::from(broken) * 1.0 + f64::from(inconsistencies) * 0.25;
            score += (weights.cross_ref - deduction).max(0.0);

            if broken > 0 {
                let ns_text = if broken == 1 { "nameserver" } else { "nameservers" };
                let points = fmt_points(f64::from(broken) * 1.0);
                breakdown.push(format!("-{points} points: {broken} broken {ns_text} found"));
                for detail in broken_details.iter().take(MAX_BROKEN_DETAILS) {
                    breakdown.push(format!("  • {detail}"));
                }
                if broken_details.len() > MAX_BROKEN_DETAILS {
                    let hidden = broken_details.len() - MAX_BROKEN_DETAILS;
                    breakdown.push(format!("  • ... and {hidden} more"));
                }
            }
            if inconsistencies > 0 {
                let ref_text = if inconsistencies == 1 {
                    "reference"
                } else {
                    "references"
                };
                let points = fmt_points(f64::from(inconsistencies) * 0.25);
                breakdown.push(format!(
                    "-{points} points: {inconsistencies} inconsistent nameserver {ref_text} found"
                ));
            }
        }
    }

    let max_score = 10.0_f64;
    let score = ((score * 10.0).round() / 10.0).min(max_score);

    HealthScore {
        score,
        max_score,
        breakdown,
        percentage: (score / max_score) * 100.0,
    }
}

/// Format a point value with as few digits as it needs: `3`, `0.7`, `2.1`,
/// `0.25`.
fn fmt_points(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.round()).abs() < f64::EPSILON {
        format!("{rounded:.0}")
    } else if (rounded * 10.0 - (rounded * 10.0).round()).abs() < 1e-9 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded:.2}")
    }
}

// ==================== health score tests ====================
