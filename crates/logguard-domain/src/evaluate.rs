//! Requirement evaluation: pure classification of findings against a spec.
//!
//! Evaluation is a deterministic function of immutable inputs. Findings are
//! consumed in the order the extractor produced them and requirement items in
//! declaration order, so a given (spec, findings) pair always classifies
//! identically. Absent findings are the expected recoverable path: they
//! classify as missing, never as an engine error.

use logguard_types::{CheckStatus, Finding};

use crate::pattern::CompiledPattern;
use crate::spec::{CheckSpec, PatternUsage};
use crate::waiver::{
    resolve_global, resolve_selective, UnusedEntry, Violation, WaivedViolation, WaiverPolicy,
};

/// A finding that satisfied a requirement, with the declared pattern when
/// pattern-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Satisfied {
    pub finding: Finding,
    pub requirement: Option<String>,
}

/// The classified outcome of one evaluation, before assembly into the
/// terminal result.
#[derive(Debug, Clone)]
pub struct Classified {
    pub mode: &'static str,
    pub status: CheckStatus,
    pub found: Vec<Satisfied>,
    pub missing: Vec<Violation>,
    pub extra: Vec<Violation>,
    /// Violations reclassified by a waiver. Entries with `waiver_pattern:
    /// None` came from global mode.
    pub waived: Vec<WaivedViolation>,
    pub unused: Vec<UnusedEntry>,
    /// Global-mode comment strings, echoed verbatim.
    pub global_comments: Vec<String>,
}

/// Default completeness predicate for existence mode: a finding counts as
/// compliant when its value, source file, and matched content are all
/// non-empty.
pub fn default_completeness(finding: &Finding) -> bool {
    !finding.value.is_empty()
        && !finding.source_file.is_empty()
        && !finding.matched_content.is_empty()
}

/// Evaluate `findings` against `spec`.
///
/// `completeness` is consulted only by the existence-family modes; pattern
/// modes ignore it.
pub fn evaluate<F>(spec: &CheckSpec, findings: &[Finding], completeness: F) -> Classified
where
    F: Fn(&Finding) -> bool,
{
    match spec {
        CheckSpec::Existence => {
            let (found, missing) = classify_existence(findings, &completeness);
            finish_unwaived(spec, found, missing, Vec::new())
        }
        CheckSpec::Pattern { items, usage } => {
            let (found, missing, extra) = classify_pattern(items, *usage, findings);
            finish_unwaived(spec, found, missing, extra)
        }
        CheckSpec::ExistenceWaiver { policy } => {
            let (found, missing) = classify_existence(findings, &completeness);
            finish_waived(spec, policy, found, missing, Vec::new())
        }
        CheckSpec::PatternWaiver {
            items,
            usage,
            policy,
        } => {
            let (found, missing, extra) = classify_pattern(items, *usage, findings);
            finish_waived(spec, policy, found, missing, extra)
        }
    }
}

fn classify_existence<F>(findings: &[Finding], completeness: &F) -> (Vec<Satisfied>, Vec<Violation>)
where
    F: Fn(&Finding) -> bool,
{
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for finding in findings {
        if completeness(finding) {
            found.push(Satisfied {
                finding: finding.clone(),
                requirement: None,
            });
        } else {
            missing.push(Violation::Missing {
                value: finding.value.clone(),
                expected: None,
                observed: Some(finding.clone()),
            });
        }
    }

    (found, missing)
}

/// Two-pass pattern classification.
///
/// Pass 1 claims, for each item in declared order, the first still-unclaimed
/// finding whose value matches; a finding satisfies at most one item. Pass 2
/// derives the classified sets: missing items are annotated with the first
/// unclaimed finding as the observed value (expected vs. actual), and
/// unclaimed findings become extra under existence usage or are ignored under
/// status usage.
fn classify_pattern(
    items: &[CompiledPattern],
    usage: PatternUsage,
    findings: &[Finding],
) -> (Vec<Satisfied>, Vec<Violation>, Vec<Violation>) {
    let mut claimed = vec![false; findings.len()];
    let mut matched: Vec<Option<usize>> = Vec::with_capacity(items.len());

    for item in items {
        let hit = findings
            .iter()
            .enumerate()
            .position(|(idx, finding)| !claimed[idx] && item.is_match(&finding.value));
        if let Some(idx) = hit {
            claimed[idx] = true;
        }
        matched.push(hit);
    }

    let first_unclaimed = findings
        .iter()
        .zip(&claimed)
        .find(|(_, claimed)| !**claimed)
        .map(|(finding, _)| finding.clone());

    let mut found = Vec::new();
    let mut missing = Vec::new();

    for (item, hit) in items.iter().zip(&matched) {
        match hit {
            Some(idx) => found.push(Satisfied {
                finding: findings[*idx].clone(),
                requirement: Some(item.raw().to_string()),
            }),
            None => missing.push(Violation::Missing {
                value: item.raw().to_string(),
                expected: Some(item.raw().to_string()),
                observed: first_unclaimed.clone(),
            }),
        }
    }

    let extra = match usage {
        PatternUsage::Existence => findings
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(finding, _)| Violation::Extra {
                finding: finding.clone(),
            })
            .collect(),
        PatternUsage::Status => Vec::new(),
    };

    (found, missing, extra)
}

fn finish_unwaived(
    spec: &CheckSpec,
    found: Vec<Satisfied>,
    missing: Vec<Violation>,
    extra: Vec<Violation>,
) -> Classified {
    // Extra alone never fails an unwaived check.
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };

    Classified {
        mode: spec.mode_name(),
        status,
        found,
        missing,
        extra,
        waived: Vec::new(),
        unused: Vec::new(),
        global_comments: Vec::new(),
    }
}

fn finish_waived(
    spec: &CheckSpec,
    policy: &WaiverPolicy,
    found: Vec<Satisfied>,
    missing: Vec<Violation>,
    extra: Vec<Violation>,
) -> Classified {
    // Missing first, then extra, each in original order; resolution order is
    // part of the first-match-wins contract.
    let mut violations = missing;
    violations.extend(extra);

    match policy {
        WaiverPolicy::Global { comments } => {
            let waived = resolve_global(violations);
            Classified {
                mode: spec.mode_name(),
                status: CheckStatus::Pass,
                found,
                missing: Vec::new(),
                extra: Vec::new(),
                waived,
                unused: Vec::new(),
                global_comments: comments.clone(),
            }
        }
        WaiverPolicy::Selective { entries } => {
            let resolution = resolve_selective(entries, violations);
            let (missing, extra): (Vec<_>, Vec<_>) = resolution
                .residual
                .into_iter()
                .partition(Violation::is_missing);

            let status = if missing.is_empty() && extra.is_empty() {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            };

            Classified {
                mode: spec.mode_name(),
                status,
                found,
                missing,
                extra,
                waived: resolution.waived,
                unused: resolution.unused,
                global_comments: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logguard_types::{CheckConfig, CountValue, RequirementsConfig, WaiveItemConfig, WaiversConfig};
    use std::collections::BTreeMap;

    fn finding(value: &str) -> Finding {
        Finding {
            value: value.to_string(),
            source_file: "logs/run.log".to_string(),
            line_number: Some(7),
            matched_content: format!("tool: {value}"),
            fields: BTreeMap::new(),
            context: None,
        }
    }

    fn pattern_spec(items: &[&str], usage: PatternUsage) -> CheckSpec {
        let config = CheckConfig {
            requirements: RequirementsConfig {
                value: CountValue::Count(items.len() as i64),
                pattern_items: items.iter().map(|s| s.to_string()).collect(),
            },
            waivers: WaiversConfig::default(),
        };
        CheckSpec::from_config(&config, usage).expect("pattern spec")
    }

    fn pattern_waiver_spec(
        items: &[&str],
        usage: PatternUsage,
        waivers: &[(&str, Option<&str>)],
    ) -> CheckSpec {
        let config = CheckConfig {
            requirements: RequirementsConfig {
                value: CountValue::Count(items.len() as i64),
                pattern_items: items.iter().map(|s| s.to_string()).collect(),
            },
            waivers: WaiversConfig {
                value: CountValue::Count(waivers.len() as i64),
                waive_items: waivers
                    .iter()
                    .map(|(name, reason)| WaiveItemConfig::Rule {
                        name: name.to_string(),
                        reason: reason.map(str::to_string),
                    })
                    .collect(),
            },
        };
        CheckSpec::from_config(&config, usage).expect("pattern+waiver spec")
    }

    fn global_spec(comments: &[&str]) -> CheckSpec {
        let config = CheckConfig {
            requirements: RequirementsConfig::default(),
            waivers: WaiversConfig {
                value: CountValue::Count(0),
                waive_items: comments
                    .iter()
                    .map(|c| WaiveItemConfig::Comment(c.to_string()))
                    .collect(),
            },
        };
        CheckSpec::from_config(&config, PatternUsage::Existence).expect("global spec")
    }

    #[test]
    fn existence_passes_when_all_findings_complete() {
        let spec = CheckSpec::Existence;
        let findings = vec![finding("Genus 21.1"), finding("Innovus 22.1")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert_eq!(classified.found.len(), 2);
        assert!(classified.missing.is_empty());
        assert!(classified.found.iter().all(|s| s.requirement.is_none()));
    }

    #[test]
    fn existence_fails_on_incomplete_finding() {
        let mut bad = finding("");
        bad.matched_content = String::new();
        let findings = vec![finding("Genus 21.1"), bad];
        let classified = evaluate(&CheckSpec::Existence, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Fail);
        assert_eq!(classified.found.len(), 1);
        assert_eq!(classified.missing.len(), 1);
        assert!(classified.missing[0].observed().is_some());
    }

    #[test]
    fn existence_with_no_findings_passes_vacuously() {
        let classified = evaluate(&CheckSpec::Existence, &[], default_completeness);
        assert_eq!(classified.status, CheckStatus::Pass);
        assert!(classified.found.is_empty());
    }

    #[test]
    fn custom_completeness_predicate_is_honored() {
        let findings = vec![finding("Genus 21.1")];
        let classified = evaluate(&CheckSpec::Existence, &findings, |f: &Finding| {
            f.fields.contains_key("version")
        });
        assert_eq!(classified.status, CheckStatus::Fail);
    }

    #[test]
    fn pattern_all_items_matched_passes() {
        let spec = pattern_spec(&["Genus 21.1", "regex:Innovus 2[12]"], PatternUsage::Existence);
        let findings = vec![finding("Genus 21.1-s100"), finding("Innovus 22.1")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert_eq!(classified.found.len(), 2);
        assert_eq!(classified.found[0].requirement.as_deref(), Some("Genus 21.1"));
        assert_eq!(classified.found[0].finding.value, "Genus 21.1-s100");
        assert!(classified.extra.is_empty());
    }

    #[test]
    fn pattern_missing_item_records_observed_finding() {
        let spec = pattern_spec(&["Genus 21.1"], PatternUsage::Existence);
        let findings = vec![finding("Genus 20.1")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Fail);
        assert_eq!(classified.missing.len(), 1);
        assert_eq!(classified.missing[0].expected(), Some("Genus 21.1"));
        let observed = classified.missing[0].observed().expect("observed");
        assert_eq!(observed.value, "Genus 20.1");
        // The non-matching finding is also surfaced as extra under existence usage.
        assert_eq!(classified.extra.len(), 1);
    }

    #[test]
    fn pattern_missing_with_no_findings_has_no_observed() {
        let spec = pattern_spec(&["Genus 21.1"], PatternUsage::Existence);
        let classified = evaluate(&spec, &[], default_completeness);

        assert_eq!(classified.status, CheckStatus::Fail);
        assert_eq!(classified.missing.len(), 1);
        assert!(classified.missing[0].observed().is_none());
    }

    #[test]
    fn pattern_extra_alone_never_fails() {
        let spec = pattern_spec(&["Genus 21.1"], PatternUsage::Existence);
        let findings = vec![finding("Genus 21.1"), finding("stray_block")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert_eq!(classified.extra.len(), 1);
        assert_eq!(classified.extra[0].value(), "stray_block");
    }

    #[test]
    fn status_usage_ignores_unclaimed_findings() {
        let spec = pattern_spec(&["Genus 21.1"], PatternUsage::Status);
        let findings = vec![finding("Genus 21.1"), finding("stray_block")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert!(classified.extra.is_empty());
    }

    #[test]
    fn each_finding_satisfies_at_most_one_item() {
        // Both items match the same single finding; only the first may claim it.
        let spec = pattern_spec(&["Genus", "Genus 21"], PatternUsage::Status);
        let findings = vec![finding("Genus 21.1")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Fail);
        assert_eq!(classified.found.len(), 1);
        assert_eq!(classified.found[0].requirement.as_deref(), Some("Genus"));
        assert_eq!(classified.missing.len(), 1);
        assert_eq!(classified.missing[0].value(), "Genus 21");
    }

    #[test]
    fn waiver_reclassifies_missing_to_info() {
        let spec = pattern_waiver_spec(
            &["Genus 21.1", "legacy_block"],
            PatternUsage::Status,
            &[("legacy_*", Some("approved by review"))],
        );
        let findings = vec![finding("Genus 21.1")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert_eq!(classified.waived.len(), 1);
        assert_eq!(classified.waived[0].violation.value(), "legacy_block");
        assert_eq!(
            classified.waived[0].waiver_pattern.as_deref(),
            Some("legacy_*")
        );
        assert_eq!(
            classified.waived[0].reason.as_deref(),
            Some("approved by review")
        );
        assert!(classified.missing.is_empty());
        assert!(classified.unused.is_empty());
    }

    #[test]
    fn unmatched_waiver_entry_is_unused_and_check_still_fails() {
        let spec = pattern_waiver_spec(
            &["Genus 21.1"],
            PatternUsage::Status,
            &[("unrelated_*", None)],
        );
        let classified = evaluate(&spec, &[], default_completeness);

        assert_eq!(classified.status, CheckStatus::Fail);
        assert_eq!(classified.missing.len(), 1);
        assert_eq!(classified.unused.len(), 1);
        assert_eq!(classified.unused[0].pattern, "unrelated_*");
    }

    #[test]
    fn waived_extra_counts_toward_resolution() {
        let spec = pattern_waiver_spec(
            &["Genus 21.1"],
            PatternUsage::Existence,
            &[("stray_*", None)],
        );
        let findings = vec![finding("Genus 21.1"), finding("stray_block")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert_eq!(classified.waived.len(), 1);
        assert!(matches!(
            classified.waived[0].violation,
            Violation::Extra { .. }
        ));
        assert!(classified.extra.is_empty());
    }

    #[test]
    fn residual_extra_fails_a_waivered_check() {
        let spec = pattern_waiver_spec(
            &["Genus 21.1"],
            PatternUsage::Existence,
            &[("other_*", None)],
        );
        let findings = vec![finding("Genus 21.1"), finding("stray_block")];
        let classified = evaluate(&spec, &findings, default_completeness);

        assert_eq!(classified.status, CheckStatus::Fail);
        assert_eq!(classified.extra.len(), 1);
    }

    #[test]
    fn global_mode_always_passes_and_echoes_comments() {
        let spec = global_spec(&["tool list differs per site"]);
        let mut bad = finding("");
        bad.matched_content = String::new();
        let classified = evaluate(&spec, &[bad], default_completeness);

        assert_eq!(classified.status, CheckStatus::Pass);
        assert!(classified.missing.is_empty());
        assert_eq!(classified.waived.len(), 1);
        assert!(classified.waived[0].waiver_pattern.is_none());
        assert_eq!(
            classified.global_comments,
            vec!["tool list differs per site".to_string()]
        );
    }

    #[test]
    fn evaluation_is_deterministic() {
        let spec = pattern_waiver_spec(
            &["Genus 21.1", "legacy_block"],
            PatternUsage::Existence,
            &[("legacy_*", None)],
        );
        let findings = vec![finding("Genus 21.1"), finding("stray_block")];

        let a = evaluate(&spec, &findings, default_completeness);
        let b = evaluate(&spec, &findings, default_completeness);

        assert_eq!(a.status, b.status);
        assert_eq!(a.found, b.found);
        assert_eq!(a.missing, b.missing);
        assert_eq!(a.extra, b.extra);
        assert_eq!(a.waived, b.waived);
    }
}
