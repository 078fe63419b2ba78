//! Waiver policies and violation resolution.
//!
//! Two policies exist. Global mode unconditionally converts every violation
//! into an informational record and never attempts matching; its configured
//! entries are free-text comments echoed as documentation. Selective mode
//! matches each violation against the configured entries in declaration order,
//! first match wins, and entries that matched nothing are reported as unused.
//!
//! Entries are held in an ordered `Vec`: first-match-wins resolution is only
//! reproducible if declaration order survives.

use logguard_types::Finding;

use crate::pattern::CompiledPattern;

/// One selective waiver entry. The raw pattern text is preserved for result
/// provenance via [`CompiledPattern::raw`].
#[derive(Debug, Clone)]
pub struct WaiverRule {
    pub pattern: CompiledPattern,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub enum WaiverPolicy {
    /// Force PASS; echo `comments` verbatim; no matching, no unused tracking.
    Global { comments: Vec<String> },
    /// Match violations against `entries` in declaration order.
    Selective { entries: Vec<WaiverRule> },
}

/// One unwaived violation, carrying enough provenance to report expected vs.
/// actual without re-running.
///
/// An extra violation always originates from a concrete finding, so its arm
/// carries the finding unconditionally; only missing items can lack one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A requirement item with no compliant match.
    Missing {
        /// The identifying value waiver entries are matched against: the
        /// declared pattern text for a pattern item, the finding value for an
        /// incomplete finding.
        value: String,
        /// The declared pattern behind the violation, when pattern-based.
        expected: Option<String>,
        /// The closest observed finding, when one exists.
        observed: Option<Finding>,
    },
    /// A finding not claimed by any requirement item.
    Extra { finding: Finding },
}

impl Violation {
    /// The identifying value waiver entries are matched against.
    pub fn value(&self) -> &str {
        match self {
            Violation::Missing { value, .. } => value,
            Violation::Extra { finding } => &finding.value,
        }
    }

    pub fn expected(&self) -> Option<&str> {
        match self {
            Violation::Missing { expected, .. } => expected.as_deref(),
            Violation::Extra { .. } => None,
        }
    }

    /// The violating (or closest observed) finding, when one exists.
    pub fn observed(&self) -> Option<&Finding> {
        match self {
            Violation::Missing { observed, .. } => observed.as_ref(),
            Violation::Extra { finding } => Some(finding),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Violation::Missing { .. })
    }
}

/// A violation claimed by a waiver entry (or by global mode, where no entry
/// is recorded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaivedViolation {
    pub violation: Violation,
    pub waiver_pattern: Option<String>,
    pub reason: Option<String>,
}

/// A waiver entry that matched zero violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedEntry {
    pub pattern: String,
    pub reason: Option<String>,
}

/// Outcome of selective resolution.
#[derive(Debug, Clone, Default)]
pub struct WaiverResolution {
    pub waived: Vec<WaivedViolation>,
    /// Violations no entry claimed, in original order.
    pub residual: Vec<Violation>,
    /// Entries that matched zero violations, in declaration order.
    pub unused: Vec<UnusedEntry>,
}

/// Resolve violations against selective waiver entries.
///
/// For each violation the entries are tried in declaration order and the
/// first match wins; later entries that would also have matched stay eligible
/// for other violations and surface as unused only if they claim none.
pub fn resolve_selective(entries: &[WaiverRule], violations: Vec<Violation>) -> WaiverResolution {
    let mut hits = vec![0u32; entries.len()];
    let mut resolution = WaiverResolution::default();

    for violation in violations {
        let claimed = entries
            .iter()
            .position(|entry| entry.pattern.is_match(violation.value()));

        match claimed {
            Some(idx) => {
                hits[idx] = hits[idx].saturating_add(1);
                resolution.waived.push(WaivedViolation {
                    violation,
                    waiver_pattern: Some(entries[idx].pattern.raw().to_string()),
                    reason: entries[idx].reason.clone(),
                });
            }
            None => resolution.residual.push(violation),
        }
    }

    for (entry, hit_count) in entries.iter().zip(&hits) {
        if *hit_count == 0 {
            resolution.unused.push(UnusedEntry {
                pattern: entry.pattern.raw().to_string(),
                reason: entry.reason.clone(),
            });
        }
    }

    resolution
}

/// Resolve violations under global mode: everything is waived, nothing is
/// matched, no unused accounting.
pub fn resolve_global(violations: Vec<Violation>) -> Vec<WaivedViolation> {
    violations
        .into_iter()
        .map(|violation| WaivedViolation {
            violation,
            waiver_pattern: None,
            reason: None,
        })
        .collect()
}
