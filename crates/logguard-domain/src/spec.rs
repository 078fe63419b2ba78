//! Check spec construction: mode dispatch fixed once, up front.
//!
//! The raw configuration carries "N/A" sentinels and a dual-shape waiver
//! list. Normalization happens exactly once, here, into a closed tagged union
//! over the four evaluation modes; each variant carries only the fields it
//! needs, so no sentinel leaks into evaluation.

use logguard_types::{
    CheckConfig, CountValue, WaiveItemConfig, WaiversConfig, MODE_EXISTENCE,
    MODE_EXISTENCE_WAIVER, MODE_PATTERN, MODE_PATTERN_WAIVER,
};

use crate::pattern::{CompiledPattern, PatternError};
use crate::waiver::{WaiverPolicy, WaiverRule};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} is '{value}': counts must be a non-negative integer or \"N/A\"")]
    InvalidCount { field: String, value: String },

    #[error("{field} declares {declared} items but {actual} were provided")]
    CountMismatch {
        field: String,
        declared: i64,
        actual: usize,
    },

    #[error("requirements.value is \"N/A\" but {count} pattern_items were provided")]
    UnexpectedPatternItems { count: usize },

    #[error(
        "waivers.value is 0 (global) but waive_items[{index}] is a {{name, reason}} record; \
         global entries are free-text comments"
    )]
    RecordInGlobalMode { index: usize },

    #[error(
        "waivers.value is {declared} (selective) but waive_items[{index}] is a plain string; \
         selective entries are {{name, reason}} records"
    )]
    CommentInSelectiveMode { declared: i64, index: usize },

    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
}

/// How a calling checker uses its pattern items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternUsage {
    /// Pattern items denote required content; findings matched by no item are
    /// classified as extra.
    #[default]
    Existence,
    /// Pattern items denote specific items whose extracted status is being
    /// verified; extra is left empty by convention.
    Status,
}

/// The four evaluation modes, fixed once from the shape of the requirement
/// and waiver configuration.
#[derive(Debug, Clone)]
pub enum CheckSpec {
    Existence,
    Pattern {
        items: Vec<CompiledPattern>,
        usage: PatternUsage,
    },
    PatternWaiver {
        items: Vec<CompiledPattern>,
        usage: PatternUsage,
        policy: WaiverPolicy,
    },
    ExistenceWaiver {
        policy: WaiverPolicy,
    },
}

impl CheckSpec {
    /// Normalize a raw configuration into a spec.
    ///
    /// All configuration problems (bad counts, shape mismatches, malformed
    /// sole-alternative patterns) surface here, before any evaluation begins.
    pub fn from_config(config: &CheckConfig, usage: PatternUsage) -> Result<Self, ConfigError> {
        let items = compile_requirements(config)?;
        let policy = waiver_policy(&config.waivers)?;

        Ok(match (items, policy) {
            (None, None) => CheckSpec::Existence,
            (Some(items), None) => CheckSpec::Pattern { items, usage },
            (Some(items), Some(policy)) => CheckSpec::PatternWaiver {
                items,
                usage,
                policy,
            },
            (None, Some(policy)) => CheckSpec::ExistenceWaiver { policy },
        })
    }

    /// Stable mode name as it appears in results.
    pub fn mode_name(&self) -> &'static str {
        match self {
            CheckSpec::Existence => MODE_EXISTENCE,
            CheckSpec::Pattern { .. } => MODE_PATTERN,
            CheckSpec::PatternWaiver { .. } => MODE_PATTERN_WAIVER,
            CheckSpec::ExistenceWaiver { .. } => MODE_EXISTENCE_WAIVER,
        }
    }

    pub fn has_waivers(&self) -> bool {
        matches!(
            self,
            CheckSpec::PatternWaiver { .. } | CheckSpec::ExistenceWaiver { .. }
        )
    }
}

fn declared_count(field: &str, value: &CountValue) -> Result<Option<i64>, ConfigError> {
    match value {
        CountValue::Count(n) if *n >= 0 => Ok(Some(*n)),
        CountValue::Count(n) => Err(ConfigError::InvalidCount {
            field: field.to_string(),
            value: n.to_string(),
        }),
        CountValue::Text(_) if value.is_not_applicable() => Ok(None),
        CountValue::Text(t) => Err(ConfigError::InvalidCount {
            field: field.to_string(),
            value: t.clone(),
        }),
    }
}

/// Returns the compiled pattern items, or None for existence mode.
fn compile_requirements(config: &CheckConfig) -> Result<Option<Vec<CompiledPattern>>, ConfigError> {
    let req = &config.requirements;
    match declared_count("requirements.value", &req.value)? {
        None | Some(0) => {
            if req.pattern_items.is_empty() {
                Ok(None)
            } else {
                Err(ConfigError::UnexpectedPatternItems {
                    count: req.pattern_items.len(),
                })
            }
        }
        Some(declared) => {
            if declared as usize != req.pattern_items.len() {
                return Err(ConfigError::CountMismatch {
                    field: "requirements.value".to_string(),
                    declared,
                    actual: req.pattern_items.len(),
                });
            }
            let mut items = Vec::with_capacity(req.pattern_items.len());
            for raw in &req.pattern_items {
                items.push(CompiledPattern::compile(raw)?);
            }
            Ok(Some(items))
        }
    }
}

/// Returns the waiver policy, or None when waivers are not configured.
fn waiver_policy(waivers: &WaiversConfig) -> Result<Option<WaiverPolicy>, ConfigError> {
    match declared_count("waivers.value", &waivers.value)? {
        None => Ok(None),
        Some(0) => {
            let mut comments = Vec::with_capacity(waivers.waive_items.len());
            for (index, item) in waivers.waive_items.iter().enumerate() {
                match item {
                    WaiveItemConfig::Comment(text) => comments.push(text.clone()),
                    WaiveItemConfig::Rule { .. } => {
                        return Err(ConfigError::RecordInGlobalMode { index });
                    }
                }
            }
            Ok(Some(WaiverPolicy::Global { comments }))
        }
        Some(declared) => {
            if declared as usize != waivers.waive_items.len() {
                return Err(ConfigError::CountMismatch {
                    field: "waivers.value".to_string(),
                    declared,
                    actual: waivers.waive_items.len(),
                });
            }
            let mut entries = Vec::with_capacity(waivers.waive_items.len());
            for (index, item) in waivers.waive_items.iter().enumerate() {
                match item {
                    WaiveItemConfig::Rule { name, reason } => entries.push(WaiverRule {
                        pattern: CompiledPattern::compile(name)?,
                        reason: reason.clone(),
                    }),
                    WaiveItemConfig::Comment(_) => {
                        return Err(ConfigError::CommentInSelectiveMode { declared, index });
                    }
                }
            }
            Ok(Some(WaiverPolicy::Selective { entries }))
        }
    }
}
