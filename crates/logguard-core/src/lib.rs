//! Result assembly and the workspace-boundary glue for logguard.
//!
//! `check` runs an evaluation and assembles the terminal [`CheckResult`]
//! with detail strings, severity-tagged annotations, markdown, and the exit
//! code. `config` is the only module that touches the filesystem.
//!
//! [`CheckResult`]: logguard_types::CheckResult

pub mod check;
pub mod config;
pub mod render;

pub use check::{render_annotations, run_check, run_check_with, CheckOutcome};
pub use config::{load_config, load_spec, parse_config_str, spec_from_str};
pub use render::render_markdown_for_result;
