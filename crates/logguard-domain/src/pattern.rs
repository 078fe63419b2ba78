//! Pattern descriptor compilation and matching.
//!
//! A descriptor encodes one or more alternatives separated by `|`. Each
//! alternative is classified independently:
//!
//! - `regex:` prefix — compiled regular expression, match = found anywhere
//! - glob metacharacters `*` / `?` — wildcard, match = whole value
//! - anything else — substring containment (the default, most permissive)
//!
//! The overall match is the OR of the alternatives, short-circuiting left to
//! right. Splitting happens before classification, so a `|` inside a regex
//! alternative starts a new alternative.

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

/// Marker prefix selecting regex classification for an alternative.
pub const REGEX_PREFIX: &str = "regex:";

/// Delimiter separating alternatives within one descriptor.
pub const ALTERNATION_DELIMITER: char = '|';

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern '{pattern}' has invalid regex '{alternative}': {source}")]
    InvalidRegex {
        pattern: String,
        alternative: String,
        source: regex::Error,
    },

    #[error("pattern '{pattern}' has invalid wildcard '{alternative}': {source}")]
    InvalidWildcard {
        pattern: String,
        alternative: String,
        source: globset::Error,
    },

    #[error("pattern '{pattern}' has no usable alternatives")]
    Empty { pattern: String },
}

#[derive(Debug, Clone)]
enum Matcher {
    Contains(String),
    Wildcard(GlobMatcher),
    Regex(Regex),
    /// An alternative that failed to compile inside an OR-list. Never matches;
    /// a sole broken alternative is a load-time error instead.
    Broken,
}

#[derive(Debug, Clone)]
struct Alternative {
    raw: String,
    matcher: Matcher,
}

impl Alternative {
    fn is_match(&self, value: &str) -> bool {
        match &self.matcher {
            Matcher::Contains(token) => value.contains(token.as_str()),
            Matcher::Wildcard(glob) => glob.is_match(value),
            Matcher::Regex(re) => re.is_match(value),
            Matcher::Broken => false,
        }
    }
}

/// A compiled pattern descriptor. The raw descriptor text is preserved for
/// provenance in results.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    raw: String,
    alternatives: Vec<Alternative>,
    broken_alternatives: u32,
}

impl CompiledPattern {
    /// Compile a raw descriptor.
    ///
    /// A descriptor whose only alternative fails to compile is a configuration
    /// error. In an OR-list of two or more alternatives a broken one degrades
    /// to a never-matching alternative so a single malformed alternative
    /// cannot abort an otherwise-passing check.
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        let parts: Vec<&str> = raw
            .split(ALTERNATION_DELIMITER)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            return Err(PatternError::Empty {
                pattern: raw.to_string(),
            });
        }

        let lenient = parts.len() > 1;
        let mut alternatives = Vec::with_capacity(parts.len());
        let mut broken_alternatives = 0u32;

        for part in parts {
            match compile_alternative(part) {
                Ok(matcher) => alternatives.push(Alternative {
                    raw: part.to_string(),
                    matcher,
                }),
                Err(_) if lenient => {
                    broken_alternatives = broken_alternatives.saturating_add(1);
                    alternatives.push(Alternative {
                        raw: part.to_string(),
                        matcher: Matcher::Broken,
                    });
                }
                Err(err) => {
                    return Err(match err {
                        AlternativeError::Regex(source) => PatternError::InvalidRegex {
                            pattern: raw.to_string(),
                            alternative: part.to_string(),
                            source,
                        },
                        AlternativeError::Wildcard(source) => PatternError::InvalidWildcard {
                            pattern: raw.to_string(),
                            alternative: part.to_string(),
                            source,
                        },
                    });
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            alternatives,
            broken_alternatives,
        })
    }

    /// The raw descriptor text as declared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of alternatives that failed to compile and were degraded to
    /// never-matching. Non-zero only for OR-lists.
    pub fn broken_alternatives(&self) -> u32 {
        self.broken_alternatives
    }

    /// True iff `value` satisfies at least one alternative.
    pub fn is_match(&self, value: &str) -> bool {
        self.alternatives.iter().any(|alt| alt.is_match(value))
    }
}

enum AlternativeError {
    Regex(regex::Error),
    Wildcard(globset::Error),
}

fn compile_alternative(token: &str) -> Result<Matcher, AlternativeError> {
    if let Some(pattern) = token.strip_prefix(REGEX_PREFIX) {
        let re = Regex::new(pattern.trim()).map_err(AlternativeError::Regex)?;
        return Ok(Matcher::Regex(re));
    }

    if token.contains('*') || token.contains('?') {
        // literal_separator stays off so `*` spans the whole value, including
        // any path separators inside it.
        let glob = GlobBuilder::new(token)
            .build()
            .map_err(AlternativeError::Wildcard)?;
        return Ok(Matcher::Wildcard(glob.compile_matcher()));
    }

    Ok(Matcher::Contains(token.to_string()))
}
