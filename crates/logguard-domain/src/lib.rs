//! I/O-free evaluation logic for logguard.
//!
//! Everything in this crate is a pure function of immutable inputs: pattern
//! compilation and matching, spec construction from raw configuration, waiver
//! resolution, and the evaluator that ties them together. File access, report
//! rendering, and exit-code mapping live in `logguard-core`.

pub mod evaluate;
pub mod pattern;
pub mod spec;
pub mod waiver;

pub use evaluate::{default_completeness, evaluate, Classified, Satisfied};
pub use pattern::{CompiledPattern, PatternError};
pub use spec::{CheckSpec, ConfigError, PatternUsage};
pub use waiver::{UnusedEntry, Violation, WaivedViolation, WaiverPolicy, WaiverRule};
