use logguard_types::CheckResult;

pub fn render_markdown_for_result(result: &CheckResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("## logguard — {}\n\n", result.status.as_str()));

    out.push_str(&format!(
        "Mode `{mode}`: **{found}** found, **{missing}** missing",
        mode = result.mode,
        found = result.counts.found,
        missing = result.counts.missing,
    ));
    if result.extra.is_some() {
        out.push_str(&format!(", **{}** extra", result.counts.extra));
    }
    if result.waived.is_some() {
        out.push_str(&format!(
            ", **{}** waived, **{}** unused waiver(s)",
            result.counts.waived, result.counts.unused_waivers
        ));
    }
    out.push_str("\n\n");

    if !result.missing.is_empty() {
        out.push_str("### Missing\n\n");
        out.push_str("| Expected | Observed | Location |\n");
        out.push_str("|---|---|---|\n");
        for item in &result.missing {
            let (observed, location) = match &item.observed {
                Some(f) => (escape_md(&f.value), escape_md(&f.location())),
                None => ("-".to_string(), "-".to_string()),
            };
            out.push_str(&format!(
                "| `{}` | `{}` | `{}` |\n",
                escape_md(item.expected.as_deref().unwrap_or("-")),
                observed,
                location
            ));
        }
        out.push('\n');
    }

    if let Some(extra) = result.extra.as_deref() {
        if !extra.is_empty() {
            out.push_str("### Extra\n\n");
            out.push_str("| Value | Location |\n");
            out.push_str("|---|---|\n");
            for item in extra {
                out.push_str(&format!(
                    "| `{}` | `{}` |\n",
                    escape_md(&item.finding.value),
                    escape_md(&item.finding.location())
                ));
            }
            out.push('\n');
        }
    }

    if let Some(waived) = result.waived.as_deref() {
        if !waived.is_empty() {
            out.push_str("### Waived\n\n");
            out.push_str("| Value | Waiver | Reason | Tag |\n");
            out.push_str("|---|---|---|---|\n");
            for item in waived {
                out.push_str(&format!(
                    "| `{}` | `{}` | {} | `{}` |\n",
                    escape_md(&item.value),
                    escape_md(item.waiver_pattern.as_deref().unwrap_or("-")),
                    escape_md(item.reason.as_deref().unwrap_or("-")),
                    escape_md(&item.tag)
                ));
            }
            out.push('\n');
        }
    }

    if let Some(unused) = result.unused_waivers.as_deref() {
        if !unused.is_empty() {
            out.push_str("### Unused waivers\n\n");
            for item in unused {
                match &item.reason {
                    Some(reason) => out.push_str(&format!(
                        "- `{}` ({})\n",
                        escape_md(&item.pattern),
                        escape_md(reason)
                    )),
                    None => out.push_str(&format!("- `{}`\n", escape_md(&item.pattern))),
                }
            }
            out.push('\n');
        }
    }

    if !result.waiver_comments.is_empty() {
        out.push_str("### Waiver comments\n\n");
        for comment in &result.waiver_comments {
            out.push_str(&format!("- {}\n", escape_md(&comment.comment)));
        }
        out.push('\n');
    }

    if !result.found.is_empty() {
        out.push_str("### Found\n\n");
        out.push_str("| Requirement | Value | Location |\n");
        out.push_str("|---|---|---|\n");
        for item in &result.found {
            out.push_str(&format!(
                "| `{}` | `{}` | `{}` |\n",
                escape_md(item.requirement.as_deref().unwrap_or("-")),
                escape_md(&item.finding.value),
                escape_md(&item.finding.location())
            ));
        }
        out.push('\n');
    }

    if result.missing.is_empty() && result.found.is_empty() {
        out.push_str("No findings.\n");
    }

    out
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('`', "\\`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use logguard_types::{
        CheckStatus, Finding, FoundItem, MissingItem, ResultCounts, CHECK_SCHEMA_V1, MODE_PATTERN,
    };
    use std::collections::BTreeMap;

    fn finding(value: &str) -> Finding {
        Finding {
            value: value.to_string(),
            source_file: "logs/route.log".to_string(),
            line_number: Some(3),
            matched_content: value.to_string(),
            fields: BTreeMap::new(),
            context: None,
        }
    }

    fn base_result() -> CheckResult {
        CheckResult {
            schema: CHECK_SCHEMA_V1.to_string(),
            status: CheckStatus::Fail,
            mode: MODE_PATTERN.to_string(),
            found: vec![FoundItem {
                detail: "'Genus' satisfied by 'Genus 21.1' at logs/route.log:3".to_string(),
                requirement: Some("Genus".to_string()),
                finding: finding("Genus 21.1"),
            }],
            missing: vec![MissingItem {
                detail: "expected 'Innovus 22.1', observed 'Innovus 21.1' at logs/route.log:3"
                    .to_string(),
                expected: Some("Innovus 22.1".to_string()),
                observed: Some(finding("Innovus 21.1")),
            }],
            extra: Some(vec![]),
            waived: None,
            unused_waivers: None,
            waiver_comments: vec![],
            counts: ResultCounts {
                found: 1,
                missing: 1,
                extra: 0,
                waived: 0,
                unused_waivers: 0,
            },
        }
    }

    #[test]
    fn renders_status_header_and_tables() {
        let md = render_markdown_for_result(&base_result());
        assert!(md.starts_with("## logguard — FAIL"));
        assert!(md.contains("### Missing"));
        assert!(md.contains("| `Innovus 22.1` | `Innovus 21.1` | `logs/route.log:3` |"));
        assert!(md.contains("### Found"));
        assert!(!md.contains("### Extra"), "empty sections are skipped");
    }

    #[test]
    fn escapes_markdown_metacharacters() {
        let mut result = base_result();
        result.missing[0].expected = Some("Genus|DC `21`".to_string());
        let md = render_markdown_for_result(&result);
        assert!(md.contains("Genus\\|DC \\`21\\`"));
    }

    #[test]
    fn empty_result_renders_no_findings() {
        let mut result = base_result();
        result.found.clear();
        result.missing.clear();
        let md = render_markdown_for_result(&result);
        assert!(md.contains("No findings."));
    }
}
