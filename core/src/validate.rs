use argus_protocol::Finding;
use argus_protocol::Severity;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

/// Validation outcome for one extraction: the findings that survived plus
/// how many raw objects were dropped. Drops are diagnostics, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub findings: Vec<Finding>,
    pub dropped: usize,
}

/// Filters and normalizes raw extracted objects into [`Finding`] records.
///
/// Checks run in order per object: required fields present and non-empty,
/// severity exactly one of the five enum strings, line number numeric and
/// at least 1. A line number beyond the end of the file is clamped down to
/// the last line rather than rejected. Accepted findings get an id of
/// `{file_name}-{original index}-{stamp}`, unique within one analysis call.
pub fn validate_findings(
    raw: Vec<Value>,
    file_name: &str,
    line_count: u32,
    stamp: i64,
) -> Validated {
    let total = raw.len();
    let mut findings = Vec::with_capacity(total);

    for (index, object) in raw.into_iter().enumerate() {
        if let Some(finding) = validate_one(object, file_name, line_count, stamp, index) {
            findings.push(finding);
        }
    }

    let dropped = total - findings.len();
    debug!(
        file = file_name,
        valid = findings.len(),
        total,
        "{} of {} findings valid",
        findings.len(),
        total
    );
    Validated { findings, dropped }
}

fn validate_one(
    object: Value,
    file_name: &str,
    line_count: u32,
    stamp: i64,
    index: usize,
) -> Option<Finding> {
    let Value::Object(map) = object else {
        warn!(file = file_name, index, "dropping non-object finding");
        return None;
    };

    let rule_id = non_empty_str(map.get("ruleId"));
    let name = non_empty_str(map.get("name"));
    let (Some(rule_id), Some(name)) = (rule_id, name) else {
        warn!(file = file_name, index, "dropping finding without ruleId/name");
        return None;
    };

    let severity = match map.get("severity").and_then(Value::as_str) {
        Some("CRITICAL") => Severity::Critical,
        Some("HIGH") => Severity::High,
        Some("MEDIUM") => Severity::Medium,
        Some("LOW") => Severity::Low,
        Some("INFO") => Severity::Info,
        other => {
            warn!(
                file = file_name,
                index,
                severity = ?other,
                name = name.as_str(),
                "dropping finding with invalid severity"
            );
            return None;
        }
    };

    let line_number = match map.get("lineNumber").and_then(numeric_line) {
        Some(line) => line,
        None => {
            warn!(
                file = file_name,
                index,
                name = name.as_str(),
                "dropping finding with invalid line number"
            );
            return None;
        }
    };
    let line_number = if line_number > line_count {
        warn!(
            file = file_name,
            index,
            line_number,
            line_count,
            "line number exceeds file length, clamping"
        );
        line_count
    } else {
        line_number
    };

    Some(Finding {
        id: format!("{file_name}-{index}-{stamp}"),
        rule_id,
        name,
        description: string_or_default(map.get("description")),
        severity,
        line_number,
        mitre_technique: non_empty_str(map.get("mitreTechnique")),
        fix_suggestion: string_or_default(map.get("fixSuggestion")),
        fixed_code: non_empty_str(map.get("fixedCode")),
        file_name: file_name.to_string(),
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_or_default(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Models occasionally report line numbers as floats; anything numeric and
/// >= 1 is accepted, truncated to an integer.
fn numeric_line(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return (n >= 1).then(|| u32::try_from(n).unwrap_or(u32::MAX));
    }
    value
        .as_f64()
        .filter(|n| *n >= 1.0 && n.is_finite())
        .map(|n| n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const STAMP: i64 = 1_700_000_000_000;

    fn good(rule: &str, severity: &str, line: u32) -> Value {
        json!({
            "ruleId": rule,
            "name": "Issue",
            "description": "details",
            "severity": severity,
            "lineNumber": line,
            "fixSuggestion": "fix it"
        })
    }

    #[test]
    fn clean_findings_round_trip_with_assigned_ids() {
        let raw = vec![good("CWE-89", "CRITICAL", 3), good("CWE-79", "HIGH", 7)];
        let validated = validate_findings(raw, "app.py", 50, STAMP);
        assert_eq!(validated.dropped, 0);
        assert_eq!(validated.findings.len(), 2);
        assert_eq!(validated.findings[0].id, format!("app.py-0-{STAMP}"));
        assert_eq!(validated.findings[1].id, format!("app.py-1-{STAMP}"));
        assert_eq!(validated.findings[0].severity, Severity::Critical);
        assert_eq!(validated.findings[1].file_name, "app.py");
    }

    #[test]
    fn unknown_severity_is_dropped() {
        let mut raw = vec![
            good("CWE-1", "CRITICAL", 1),
            good("CWE-2", "HIGH", 2),
            good("CWE-3", "MEDIUM", 3),
            good("CWE-4", "LOW", 4),
        ];
        raw.push(good("CWE-5", "SEVERE", 5));
        let validated = validate_findings(raw, "app.py", 50, STAMP);
        assert_eq!(validated.findings.len(), 4);
        assert_eq!(validated.dropped, 1);
    }

    #[test]
    fn lowercase_severity_is_dropped() {
        let validated = validate_findings(vec![good("CWE-1", "critical", 1)], "a", 10, STAMP);
        assert!(validated.findings.is_empty());
        assert_eq!(validated.dropped, 1);
    }

    #[test]
    fn missing_required_fields_drop_the_finding() {
        let raw = vec![
            json!({ "name": "no rule", "severity": "LOW", "lineNumber": 1 }),
            json!({ "ruleId": "CWE-1", "severity": "LOW", "lineNumber": 1 }),
            json!({ "ruleId": "", "name": "empty rule", "severity": "LOW", "lineNumber": 1 }),
            json!("not even an object"),
        ];
        let validated = validate_findings(raw, "a", 10, STAMP);
        assert!(validated.findings.is_empty());
        assert_eq!(validated.dropped, 4);
    }

    #[test]
    fn zero_or_negative_line_numbers_drop_the_finding() {
        let raw = vec![
            json!({ "ruleId": "CWE-1", "name": "a", "severity": "LOW", "lineNumber": 0 }),
            json!({ "ruleId": "CWE-2", "name": "b", "severity": "LOW", "lineNumber": -4 }),
            json!({ "ruleId": "CWE-3", "name": "c", "severity": "LOW", "lineNumber": "7" }),
        ];
        let validated = validate_findings(raw, "a", 10, STAMP);
        assert!(validated.findings.is_empty());
    }

    #[test]
    fn out_of_range_line_number_is_clamped_not_dropped() {
        let validated = validate_findings(vec![good("CWE-1", "HIGH", 9999)], "a", 10, STAMP);
        assert_eq!(validated.findings.len(), 1);
        assert_eq!(validated.findings[0].line_number, 10);
        assert_eq!(validated.dropped, 0);
    }

    #[test]
    fn float_line_numbers_are_tolerated() {
        let raw = vec![json!({
            "ruleId": "CWE-1",
            "name": "a",
            "severity": "INFO",
            "lineNumber": 12.0
        })];
        let validated = validate_findings(raw, "a", 50, STAMP);
        assert_eq!(validated.findings[0].line_number, 12);
    }

    #[test]
    fn optional_fields_default_cleanly() {
        let raw = vec![json!({
            "ruleId": "CWE-798",
            "name": "Hardcoded secret",
            "severity": "HIGH",
            "lineNumber": 2
        })];
        let validated = validate_findings(raw, "a", 10, STAMP);
        let finding = &validated.findings[0];
        assert_eq!(finding.description, "");
        assert_eq!(finding.fix_suggestion, "");
        assert_eq!(finding.mitre_technique, None);
        assert_eq!(finding.fixed_code, None);
    }
}
