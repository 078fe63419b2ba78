//! Data types (config + results) for logguard.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Schema Identifiers ─────────────────────────────────────────
pub const CHECK_SCHEMA_V1: &str = "logguard.check.v1";

// ── Frozen Vocabulary ──────────────────────────────────────────
// Annotation tags relied on by report renderers.
pub const TAG_WAIVER: &str = "[WAIVER]";
pub const TAG_WAIVED_AS_INFO: &str = "[WAIVED_AS_INFO]";
pub const TAG_WAIVED_INFO: &str = "[WAIVED_INFO]";

// Mode names as they appear in results.
pub const MODE_EXISTENCE: &str = "existence";
pub const MODE_PATTERN: &str = "pattern";
pub const MODE_PATTERN_WAIVER: &str = "pattern_waiver";
pub const MODE_EXISTENCE_WAIVER: &str = "existence_waiver";

// Sentinel accepted in count fields.
pub const COUNT_NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, CheckStatus::Pass)
    }
}

/// One datum extracted from a source log, with full provenance.
///
/// Findings are constructed once per run by an external extractor and never
/// mutated; every derived result item carries its originating finding intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    /// The extracted value the checker reasons about.
    pub value: String,
    /// Log file the value was extracted from.
    pub source_file: String,
    /// 1-based line number within `source_file`, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// The raw text the extractor matched.
    pub matched_content: String,
    /// Optional structured fields attached by the extractor.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Optional surrounding context captured by the extractor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Finding {
    /// Short `file:line` location string for report lines.
    pub fn location(&self) -> String {
        match self.line_number {
            Some(line) => format!("{}:{}", self.source_file, line),
            None => self.source_file.clone(),
        }
    }
}

/// A requirement item satisfied by a compliant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FoundItem {
    /// Human-readable annotation for the report.
    pub detail: String,
    /// The declared pattern this item satisfied, when pattern-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    /// The finding that satisfied the item, with provenance.
    pub finding: Finding,
}

/// A requirement item with no compliant match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MissingItem {
    /// Human-readable annotation for the report.
    pub detail: String,
    /// The declared pattern that went unmatched, when pattern-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// The closest observed finding, when one exists (expected vs. actual).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<Finding>,
}

/// A finding not claimed by any requirement item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtraItem {
    /// Human-readable annotation for the report.
    pub detail: String,
    pub finding: Finding,
}

/// A violation reclassified as informational by a waiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WaivedItem {
    /// Human-readable annotation for the report.
    pub detail: String,
    /// The violation's identifying value.
    pub value: String,
    /// The declared pattern behind the violation, when pattern-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Provenance of the violating finding, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding: Option<Finding>,
    /// The waiver pattern that claimed this violation (None in global mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiver_pattern: Option<String>,
    /// The reason recorded on the waiver entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Renderer tag: `[WAIVER]` or `[WAIVED_AS_INFO]`.
    pub tag: String,
}

/// A configured waiver entry that matched zero violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UnusedWaiver {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A global-mode comment entry, echoed verbatim as documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WaiverComment {
    pub comment: String,
    /// Renderer tag, always `[WAIVED_INFO]`.
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ResultCounts {
    pub found: u32,
    pub missing: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub waived: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unused_waivers: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// The single terminal result of one evaluation.
///
/// This is the sole contract boundary for downstream consumers (report
/// rendering, exit-code mapping). Sections not applicable to the active mode
/// are omitted from serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    /// Schema identifier, always "logguard.check.v1".
    pub schema: String,
    pub status: CheckStatus,
    /// Active evaluation mode (see the MODE_* constants).
    pub mode: String,
    pub found: Vec<FoundItem>,
    pub missing: Vec<MissingItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<ExtraItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waived: Option<Vec<WaivedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unused_waivers: Option<Vec<UnusedWaiver>>,
    /// Global-mode comment entries, echoed as documentation output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waiver_comments: Vec<WaiverComment>,
    pub counts: ResultCounts,
}

// ============================================================================
// Raw configuration shapes
// ============================================================================

/// A count field that is either an integer or the `"N/A"` sentinel.
///
/// Both shapes occur in historical configurations; the sentinel (or an absent
/// field) selects the existence-family behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CountValue {
    Count(i64),
    Text(String),
}

impl Default for CountValue {
    fn default() -> Self {
        CountValue::Text(COUNT_NOT_APPLICABLE.to_string())
    }
}

impl CountValue {
    /// Returns the integer count, or None for the `"N/A"` sentinel.
    pub fn count(&self) -> Option<i64> {
        match self {
            CountValue::Count(n) => Some(*n),
            CountValue::Text(_) => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, CountValue::Text(t) if t == COUNT_NOT_APPLICABLE)
    }
}

/// Declared requirement: `"N/A"` (or absent) selects existence mode; a
/// positive count selects pattern mode with `pattern_items` bound 1:1, in
/// declared order, to logical requirement items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RequirementsConfig {
    #[serde(default)]
    pub value: CountValue,
    #[serde(default)]
    pub pattern_items: Vec<String>,
}

/// One entry of `waive_items`.
///
/// The schema has two historical shapes: plain comment strings (global mode,
/// echoed as documentation) and `{name, reason}` records (selective mode,
/// matched against violations). Both read paths are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum WaiveItemConfig {
    Comment(String),
    Rule {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

/// Declared waiver policy: `"N/A"` means none, `0` means global, a positive
/// count means selective with that many entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct WaiversConfig {
    #[serde(default)]
    pub value: CountValue,
    #[serde(default)]
    pub waive_items: Vec<WaiveItemConfig>,
}

/// The configuration surface consumed from the surrounding driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct CheckConfig {
    #[serde(default)]
    pub requirements: RequirementsConfig,
    #[serde(default)]
    pub waivers: WaiversConfig,
}
