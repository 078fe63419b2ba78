//! Fuzz target for pattern descriptor compilation and matching.
//!
//! Compilation must return an error for malformed sole alternatives and
//! degrade broken OR-list members, never panic; matching must never panic on
//! any value.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logguard_domain::CompiledPattern;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Skip excessively long descriptors to avoid timeouts.
    if text.len() > 1000 {
        return;
    }

    let (descriptor, value) = match text.split_once('\n') {
        Some((d, v)) => (d, v),
        None => (text, "Genus 21.1-s100"),
    };

    if let Ok(pattern) = CompiledPattern::compile(descriptor) {
        let _ = pattern.is_match(value);
        let _ = pattern.is_match("");
        let _ = pattern.broken_alternatives();
    }
});
