//! Fuzz target for the YAML configuration pipeline.
//!
//! Parsing and spec normalization must reject malformed input with an error,
//! never panic, and a successfully built spec must evaluate cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logguard_core::run_check;
use logguard_domain::{CheckSpec, PatternUsage};
use logguard_types::CheckConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 10_000 {
        return;
    }

    let Ok(config) = serde_yaml::from_str::<CheckConfig>(text) else {
        return;
    };

    for usage in [PatternUsage::Existence, PatternUsage::Status] {
        if let Ok(spec) = CheckSpec::from_config(&config, usage) {
            let outcome = run_check(&spec, &[]);
            let _ = outcome.result.status;
        }
    }
});
