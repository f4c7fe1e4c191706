use std::borrow::Cow;

use tracing::warn;

/// Appended verbatim after the cut when a source file exceeds a provider's
/// input budget. Not counted against the budget.
pub const TRUNCATION_MARKER: &str =
    "\n\n... [Code truncated: file too large for full analysis] ...";

/// Base audit instructions shared by every provider. The model is told to
/// answer with a bare JSON array using the exact field names the validator
/// checks for.
const SYSTEM_PROMPT: &str = r#"You are an expert code auditor with access to CVE and CWE databases, the OWASP Top 10, and the MITRE ATT&CK framework.

Perform a comprehensive review of the submitted source file and report every security vulnerability, logic bug, and quality issue you find. Check injection flaws (SQL, command, XSS), path traversal, insecure deserialization, broken authentication and access control, sensitive data exposure, SSRF, hardcoded secrets, weak cryptography, race conditions, and memory-safety errors, as well as runtime bugs, unhandled edge cases, and performance problems. Reference real CVE or CWE identifiers when an issue matches a known weakness.

For each issue provide:
- ruleId: CVE, CWE, or OWASP identifier (e.g. CVE-2021-44228, CWE-79, OWASP-A03)
- name: short issue title
- description: explanation of the threat vector and impact
- severity: one of CRITICAL, HIGH, MEDIUM, LOW, INFO
- lineNumber: exact line where the issue occurs
- mitreTechnique: MITRE ATT&CK technique id (e.g. T1059) if applicable
- fixSuggestion: remediation steps
- fixedCode: corrected code snippet

Return the result strictly as a valid JSON array of objects. Do not wrap the result in markdown code blocks. Return an empty array if no issues are found."#;

/// Extra instruction for providers without enforced JSON output.
const RAW_JSON_INSTRUCTION: &str = "IMPORTANT: You MUST return ONLY the raw JSON array, starting with [ and ending with ]. No markdown, no code fences, no explanatory text.";

/// System instruction text for a builder. Two fixed variants: providers
/// that enforce structured JSON output get the base prompt, everyone else
/// gets the raw-JSON reinforcement appended.
pub(crate) fn system_prompt(supports_structured_output: bool) -> Cow<'static, str> {
    if supports_structured_output {
        Cow::Borrowed(SYSTEM_PROMPT)
    } else {
        Cow::Owned(format!("{SYSTEM_PROMPT}\n\n{RAW_JSON_INSTRUCTION}"))
    }
}

pub(crate) fn user_prompt(file_name: &str, source: &str) -> String {
    format!("Analyze this file: {file_name}\n\n{source}")
}

/// Cuts `source` down to exactly `max_chars` characters and appends
/// [`TRUNCATION_MARKER`]. Inputs within the budget are returned unchanged.
/// Deterministic: the same input always produces the same output.
pub fn truncate_source<'a>(source: &'a str, max_chars: usize, file_name: &str) -> Cow<'a, str> {
    match source.char_indices().nth(max_chars) {
        None => Cow::Borrowed(source),
        Some((cut, _)) => {
            warn!(
                file = file_name,
                original_chars = source.chars().count(),
                kept_chars = max_chars,
                "source exceeds provider input budget, truncating"
            );
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&source[..cut]);
            out.push_str(TRUNCATION_MARKER);
            Cow::Owned(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_input_is_untouched() {
        let text = "fn main() {}";
        assert_eq!(truncate_source(text, 100, "main.rs"), text);
    }

    #[test]
    fn input_at_the_limit_is_untouched() {
        let text = "a".repeat(50);
        assert_eq!(truncate_source(&text, 50, "a.txt"), text.as_str());
    }

    #[test]
    fn long_input_is_cut_to_exactly_max_chars_plus_marker() {
        let text = "x".repeat(120);
        let truncated = truncate_source(&text, 50, "x.txt");
        assert_eq!(
            truncated.chars().count(),
            50 + TRUNCATION_MARKER.chars().count()
        );
        assert!(truncated.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_is_deterministic() {
        let text = "abc".repeat(1000);
        let first = truncate_source(&text, 100, "t").into_owned();
        let second = truncate_source(&text, 100, "t").into_owned();
        assert_eq!(first, second);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        // Multi-byte characters must not be split.
        let text = "é".repeat(40);
        let truncated = truncate_source(&text, 10, "t");
        assert!(truncated.starts_with(&"é".repeat(10)));
        assert_eq!(
            truncated.chars().count(),
            10 + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn freeform_prompt_extends_structured_prompt() {
        let structured = system_prompt(true);
        let freeform = system_prompt(false);
        assert!(freeform.starts_with(structured.as_ref()));
        assert!(freeform.contains("raw JSON array"));
    }
}
