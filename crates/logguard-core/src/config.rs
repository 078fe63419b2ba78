use std::fs;
use std::path::Path;

use anyhow::Context;

use logguard_domain::{CheckSpec, PatternUsage, WaiverPolicy};
use logguard_types::CheckConfig;

/// Parse a YAML configuration document.
pub fn parse_config_str(text: &str) -> Result<CheckConfig, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Load a YAML configuration file from disk.
pub fn load_config(path: &Path) -> anyhow::Result<CheckConfig> {
    tracing::debug!(path = %path.display(), "loading check configuration");
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_config_str(&text)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

/// Parse a YAML configuration document straight into a [`CheckSpec`].
pub fn spec_from_str(text: &str, usage: PatternUsage) -> anyhow::Result<CheckSpec> {
    let config = parse_config_str(text).context("failed to parse check configuration")?;
    let spec = CheckSpec::from_config(&config, usage).context("invalid check configuration")?;
    warn_degraded(&spec);
    Ok(spec)
}

/// Load a YAML configuration file and normalize it into a [`CheckSpec`].
pub fn load_spec(path: &Path, usage: PatternUsage) -> anyhow::Result<CheckSpec> {
    let config = load_config(path)?;
    let spec = CheckSpec::from_config(&config, usage)
        .with_context(|| format!("invalid check configuration: {}", path.display()))?;
    warn_degraded(&spec);
    Ok(spec)
}

/// Surface OR-list alternatives that failed to compile and were degraded to
/// never-matching. These are not fatal but deserve operator attention.
fn warn_degraded(spec: &CheckSpec) {
    let (items, policy) = match spec {
        CheckSpec::Existence => return,
        CheckSpec::Pattern { items, .. } => (Some(items), None),
        CheckSpec::PatternWaiver { items, policy, .. } => (Some(items), Some(policy)),
        CheckSpec::ExistenceWaiver { policy } => (None, Some(policy)),
    };

    for item in items.into_iter().flatten() {
        if item.broken_alternatives() > 0 {
            tracing::warn!(
                pattern = item.raw(),
                broken = item.broken_alternatives(),
                "pattern alternative failed to compile; treated as never-matching"
            );
        }
    }

    if let Some(WaiverPolicy::Selective { entries }) = policy {
        for entry in entries {
            if entry.pattern.broken_alternatives() > 0 {
                tracing::warn!(
                    pattern = entry.pattern.raw(),
                    broken = entry.pattern.broken_alternatives(),
                    "waiver alternative failed to compile; treated as never-matching"
                );
            }
        }
    }
}
