use logguard_domain::{
    default_completeness, evaluate, CheckSpec, Classified, Satisfied, UnusedEntry, Violation,
    WaivedViolation,
};
use logguard_types::{
    CheckResult, CheckStatus, ExtraItem, Finding, FoundItem, MissingItem, ResultCounts,
    UnusedWaiver, WaivedItem, WaiverComment, CHECK_SCHEMA_V1, MODE_EXISTENCE_WAIVER, MODE_PATTERN,
    MODE_PATTERN_WAIVER, TAG_WAIVED_AS_INFO, TAG_WAIVED_INFO, TAG_WAIVER,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub result: CheckResult,
    pub markdown: String,
    pub annotations: Vec<String>,
    pub exit_code: i32,
}

/// Evaluate `findings` against `spec` and assemble the terminal result.
///
/// Uses the default completeness predicate for existence-family modes; see
/// [`run_check_with`] for a checker-supplied predicate.
pub fn run_check(spec: &CheckSpec, findings: &[Finding]) -> CheckOutcome {
    run_check_with(spec, findings, default_completeness)
}

/// As [`run_check`], with a checker-supplied completeness predicate.
pub fn run_check_with<F>(spec: &CheckSpec, findings: &[Finding], completeness: F) -> CheckOutcome
where
    F: Fn(&Finding) -> bool,
{
    let classified = evaluate(spec, findings, completeness);
    let result = assemble(classified);

    let markdown = crate::render::render_markdown_for_result(&result);
    let annotations = render_annotations(&result);
    let exit_code = compute_exit_code(result.status);

    CheckOutcome {
        result,
        markdown,
        annotations,
        exit_code,
    }
}

/// Merge classified sets into the terminal [`CheckResult`], attaching
/// human-readable detail strings. Sections not applicable to the active mode
/// stay `None` so they are omitted from serialization.
fn assemble(classified: Classified) -> CheckResult {
    let mode = classified.mode;
    let pattern_family = mode == MODE_PATTERN || mode == MODE_PATTERN_WAIVER;
    let waiver_family = mode == MODE_PATTERN_WAIVER || mode == MODE_EXISTENCE_WAIVER;

    let found: Vec<FoundItem> = classified.found.into_iter().map(found_item).collect();

    let mut missing: Vec<MissingItem> = Vec::with_capacity(classified.missing.len());
    let mut extra: Vec<ExtraItem> = Vec::with_capacity(classified.extra.len());
    for violation in classified.missing.into_iter().chain(classified.extra) {
        match violation {
            Violation::Missing {
                value,
                expected,
                observed,
            } => missing.push(missing_item(value, expected, observed)),
            Violation::Extra { finding } => extra.push(extra_item(finding)),
        }
    }
    let waived: Vec<WaivedItem> = classified.waived.into_iter().map(waived_item).collect();
    let unused: Vec<UnusedWaiver> = classified
        .unused
        .into_iter()
        .map(|UnusedEntry { pattern, reason }| UnusedWaiver { pattern, reason })
        .collect();
    let waiver_comments: Vec<WaiverComment> = classified
        .global_comments
        .into_iter()
        .map(|comment| WaiverComment {
            comment,
            tag: TAG_WAIVED_INFO.to_string(),
        })
        .collect();

    let counts = ResultCounts {
        found: found.len() as u32,
        missing: missing.len() as u32,
        extra: extra.len() as u32,
        waived: waived.len() as u32,
        unused_waivers: unused.len() as u32,
    };

    CheckResult {
        schema: CHECK_SCHEMA_V1.to_string(),
        status: classified.status,
        mode: mode.to_string(),
        found,
        missing,
        extra: pattern_family.then_some(extra),
        waived: waiver_family.then_some(waived),
        unused_waivers: waiver_family.then_some(unused),
        waiver_comments,
        counts,
    }
}

fn found_item(satisfied: Satisfied) -> FoundItem {
    let Satisfied {
        finding,
        requirement,
    } = satisfied;
    let detail = match &requirement {
        Some(req) => format!(
            "'{req}' satisfied by '{value}' at {loc}",
            value = finding.value,
            loc = finding.location()
        ),
        None => format!(
            "found '{value}' at {loc}",
            value = finding.value,
            loc = finding.location()
        ),
    };
    FoundItem {
        detail,
        requirement,
        finding,
    }
}

fn missing_item(value: String, expected: Option<String>, observed: Option<Finding>) -> MissingItem {
    // Expected vs. actual, with file and line, so a FAIL is actionable
    // without re-running.
    let detail = match (&expected, &observed) {
        (Some(exp), Some(observed)) => format!(
            "expected '{exp}', observed '{value}' at {loc}",
            value = observed.value,
            loc = observed.location()
        ),
        (Some(exp), None) => format!("expected '{exp}', no matching finding observed"),
        (None, Some(observed)) => format!(
            "incomplete finding '{value}' at {loc}",
            loc = observed.location()
        ),
        (None, None) => format!("missing '{value}'"),
    };
    MissingItem {
        detail,
        expected,
        observed,
    }
}

fn extra_item(finding: Finding) -> ExtraItem {
    ExtraItem {
        detail: format!(
            "unexpected '{value}' at {loc}",
            value = finding.value,
            loc = finding.location()
        ),
        finding,
    }
}

fn waived_item(waived: WaivedViolation) -> WaivedItem {
    let WaivedViolation {
        violation,
        waiver_pattern,
        reason,
    } = waived;
    let (value, expected, finding) = match violation {
        Violation::Missing {
            value,
            expected,
            observed,
        } => (value, expected, observed),
        Violation::Extra { finding } => (finding.value.clone(), None, Some(finding)),
    };

    let tag = if waiver_pattern.is_some() {
        TAG_WAIVER
    } else {
        TAG_WAIVED_AS_INFO
    };

    let mut detail = match (&expected, &finding) {
        (Some(exp), Some(observed)) => format!(
            "expected '{exp}', observed '{obs}' at {loc}",
            obs = observed.value,
            loc = observed.location()
        ),
        (Some(exp), None) => format!("expected '{exp}', no matching finding observed"),
        (None, Some(observed)) => format!(
            "'{obs}' at {loc}",
            obs = observed.value,
            loc = observed.location()
        ),
        (None, None) => format!("'{value}'"),
    };
    match (&waiver_pattern, &reason) {
        (Some(pattern), Some(reason)) => {
            detail.push_str(&format!(" (waived by '{pattern}': {reason})"));
        }
        (Some(pattern), None) => detail.push_str(&format!(" (waived by '{pattern}')")),
        (None, _) => detail.push_str(" (waived globally)"),
    }

    WaivedItem {
        detail,
        value,
        expected,
        finding,
        waiver_pattern,
        reason,
        tag: tag.to_string(),
    }
}

/// Severity-tagged annotation lines for external renderers.
///
/// Unwaived violations are ERROR; waived violations are INFO `[WAIVER]` (or
/// INFO `[WAIVED_AS_INFO]` under global mode); unused waiver entries are WARN
/// `[WAIVER]`; global comments are INFO `[WAIVED_INFO]`.
pub fn render_annotations(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();

    for item in &result.missing {
        lines.push(format!("ERROR {}", item.detail));
    }
    for item in result.extra.iter().flatten() {
        lines.push(format!("ERROR {}", item.detail));
    }
    for item in result.waived.iter().flatten() {
        lines.push(format!("INFO {} {}", item.tag, item.detail));
    }
    for item in result.unused_waivers.iter().flatten() {
        match &item.reason {
            Some(reason) => lines.push(format!(
                "WARN {TAG_WAIVER} unused waiver '{}' ({reason})",
                item.pattern
            )),
            None => lines.push(format!("WARN {TAG_WAIVER} unused waiver '{}'", item.pattern)),
        }
    }
    for comment in &result.waiver_comments {
        lines.push(format!("INFO {} {}", comment.tag, comment.comment));
    }

    lines
}

fn compute_exit_code(status: CheckStatus) -> i32 {
    match status {
        CheckStatus::Pass => 0,
        CheckStatus::Fail => 2,
    }
}
