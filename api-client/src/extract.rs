use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::error::Error;
use crate::error::Result;
use crate::scan;

/// Object keys under which providers have been observed to wrap the
/// findings array instead of returning it bare.
const WRAPPER_KEYS: [&str; 3] = ["vulnerabilities", "issues", "results"];

/// Outcome of response extraction: the raw finding objects plus whether a
/// degraded recovery strategy had to be used to obtain them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub objects: Vec<Value>,
    pub used_fallback: bool,
}

/// Best-effort extraction of a findings array from untrusted provider text.
///
/// Strategies are tried in a fixed order and the first successful parse
/// wins; they are never blended:
///
/// 1. direct parse of the trimmed text;
/// 2. parse after stripping markdown code fences;
/// 3. parse of the substring from the first `[` to the last `]`;
/// 4. (applied to any successful parse) unwrap an object that nests the
///    array under a known key;
/// 5. on end-of-input parse failures, truncation recovery: cut at the last
///    complete value boundary and re-parse, then fall back to collecting
///    every individually complete object;
/// 6. re-parse after escaping raw control characters inside string
///    literals.
///
/// Fails with [`Error::UnparseableResponse`] only when every strategy comes
/// up empty.
pub fn extract_findings(raw: &str) -> Result<Extraction> {
    let direct = raw.trim();

    let first_failure = match serde_json::from_str::<Value>(direct) {
        Ok(value) => {
            return Ok(Extraction {
                objects: normalize(value),
                used_fallback: false,
            });
        }
        Err(err) => err,
    };

    let unfenced = strip_fences(direct);
    if unfenced != direct
        && let Ok(value) = serde_json::from_str::<Value>(unfenced)
    {
        return Ok(Extraction {
            objects: normalize(value),
            used_fallback: false,
        });
    }

    if let Some(slice) = bracket_slice(unfenced)
        && slice != unfenced
        && let Ok(value) = serde_json::from_str::<Value>(slice)
    {
        debug!("extracted findings array embedded in prose");
        return Ok(Extraction {
            objects: normalize(value),
            used_fallback: true,
        });
    }

    let eof_failure = serde_json::from_str::<Value>(unfenced)
        .err()
        .is_some_and(|err| err.is_eof());
    if eof_failure
        && let Some(objects) = recover_truncated(unfenced)
    {
        warn!(
            recovered = objects.len(),
            "provider response was truncated, recovered complete objects"
        );
        return Ok(Extraction {
            objects,
            used_fallback: true,
        });
    }

    let repaired_input = bracket_slice(unfenced).unwrap_or(unfenced);
    let repaired = scan::escape_control_chars(repaired_input);
    if repaired != repaired_input
        && let Ok(value) = serde_json::from_str::<Value>(&repaired)
    {
        warn!("provider response contained raw control characters, repaired");
        return Ok(Extraction {
            objects: normalize(value),
            used_fallback: true,
        });
    }

    Err(Error::UnparseableResponse {
        reason: first_failure.to_string(),
    })
}

/// Array responses pass through; object responses are unwrapped when the
/// array hides under a known key. Anything else is an empty finding set,
/// not an error.
fn normalize(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn strip_fences(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let rest = match rest.strip_suffix("```") {
        Some(r) => r.strip_suffix('\n').unwrap_or(r),
        None => rest,
    };
    rest.trim()
}

fn bracket_slice(s: &str) -> Option<&str> {
    let start = s.find('[')?;
    let end = s.rfind(']')?;
    (end > start).then(|| &s[start..=end])
}

/// Recovery for output cut off mid-token: truncate at the last complete
/// value boundary, close the array, and re-parse; if that still fails,
/// parse each complete object independently and keep the survivors.
fn recover_truncated(s: &str) -> Option<Vec<Value>> {
    if let Some(boundary) = scan::last_complete_boundary(s) {
        let mut cut = s[..boundary].trim_end().to_string();
        if let Some(stripped) = cut.strip_suffix(',') {
            cut.truncate(stripped.trim_end().len());
        }
        if cut.starts_with('[') && !cut.ends_with(']') {
            cut.push(']');
        }
        if let Ok(value) = serde_json::from_str::<Value>(&cut) {
            let objects = normalize(value);
            if !objects.is_empty() {
                return Some(objects);
            }
        }
    }

    let objects: Vec<Value> = scan::complete_objects(s)
        .into_iter()
        .filter_map(|candidate| serde_json::from_str(candidate).ok())
        .collect();
    (!objects.is_empty()).then_some(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_array() -> Value {
        json!([
            {
                "ruleId": "CWE-89",
                "name": "SQL Injection",
                "severity": "CRITICAL",
                "lineNumber": 3
            },
            {
                "ruleId": "CWE-79",
                "name": "XSS",
                "severity": "HIGH",
                "lineNumber": 7
            }
        ])
    }

    #[test]
    fn clean_array_parses_without_fallback() {
        let raw = sample_array().to_string();
        let extraction = extract_findings(&raw).expect("extract");
        assert_eq!(extraction.objects.len(), 2);
        assert!(!extraction.used_fallback);
    }

    #[test]
    fn fenced_array_matches_unfenced_result() {
        let raw = sample_array().to_string();
        let fenced = format!("```json\n{raw}\n```");
        let plain = extract_findings(&raw).expect("plain");
        let stripped = extract_findings(&fenced).expect("fenced");
        assert_eq!(plain.objects, stripped.objects);
        assert!(!stripped.used_fallback);
    }

    #[test]
    fn fence_without_language_tag() {
        let raw = format!("```\n{}\n```", sample_array());
        let extraction = extract_findings(&raw).expect("extract");
        assert_eq!(extraction.objects.len(), 2);
    }

    #[test]
    fn array_embedded_in_prose() {
        let raw = format!(
            "Here is my detailed security analysis:\n{}\nLet me know if you need more.",
            sample_array()
        );
        let extraction = extract_findings(&raw).expect("extract");
        assert_eq!(extraction.objects.len(), 2);
        assert!(extraction.used_fallback);
    }

    #[test]
    fn wrapped_object_is_unwrapped() {
        for key in ["vulnerabilities", "issues", "results"] {
            let raw = json!({ key: sample_array() }).to_string();
            let extraction = extract_findings(&raw).expect("extract");
            assert_eq!(extraction.objects.len(), 2, "key {key}");
        }
    }

    #[test]
    fn unrelated_object_yields_empty_set() {
        let extraction = extract_findings(r#"{"summary": "all good"}"#).expect("extract");
        assert!(extraction.objects.is_empty());
    }

    #[test]
    fn truncated_array_recovers_complete_prefix() {
        let full = serde_json::to_string(&sample_array()).expect("serialize");
        // Cut inside the second object's name string, simulating token
        // exhaustion.
        let cut_at = full.find("XSS").expect("marker") + 1;
        let truncated = &full[..cut_at];
        let extraction = extract_findings(truncated).expect("extract");
        assert_eq!(extraction.objects.len(), 1);
        assert_eq!(extraction.objects[0]["ruleId"], "CWE-89");
        assert!(extraction.used_fallback);
    }

    #[test]
    fn truncated_fenced_array_recovers() {
        let full = serde_json::to_string(&sample_array()).expect("serialize");
        let cut_at = full.find("XSS").expect("marker");
        let truncated = format!("```json\n{}", &full[..cut_at]);
        let extraction = extract_findings(&truncated).expect("extract");
        assert_eq!(extraction.objects.len(), 1);
    }

    #[test]
    fn individually_complete_objects_survive_broken_array() {
        // The array never closes and the final object is garbage, but two
        // elements are individually parseable.
        let raw = r#"[{"ruleId":"CWE-1","name":"a","severity":"LOW","lineNumber":1},
            {"ruleId":"CWE-2","name":"b","severity":"INFO","lineNumber":2},
            {"ruleId":"CWE-3","name":"c","severity":"HIGH","lineNumber":"#;
        let extraction = extract_findings(raw).expect("extract");
        assert_eq!(extraction.objects.len(), 2);
        assert!(extraction.used_fallback);
    }

    #[test]
    fn raw_newlines_inside_strings_are_repaired() {
        let raw = "[{\"ruleId\":\"CWE-78\",\"name\":\"cmd\",\"severity\":\"HIGH\",\"lineNumber\":2,\"description\":\"first line\nsecond line\"}]";
        let extraction = extract_findings(raw).expect("extract");
        assert_eq!(extraction.objects.len(), 1);
        assert_eq!(
            extraction.objects[0]["description"],
            "first line\nsecond line"
        );
        assert!(extraction.used_fallback);
    }

    #[test]
    fn hopeless_input_is_unparseable() {
        let err = extract_findings("the model is sorry and returns prose only").expect_err("fail");
        assert_matches!(err, Error::UnparseableResponse { .. });
    }

    #[test]
    fn empty_input_is_unparseable() {
        assert_matches!(
            extract_findings("").expect_err("fail"),
            Error::UnparseableResponse { .. }
        );
    }
}
