use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Severity scale reported by the model and enforced by validation.
///
/// Deserialization is case-sensitive: a payload carrying `"Severe"` or
/// `"critical"` does not match and the finding is dropped by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Contribution of one finding of this severity to a file risk score.
    pub fn risk_weight(self) -> u32 {
        match self {
            Severity::Critical => 25,
            Severity::High => 15,
            Severity::Medium => 5,
            Severity::Low => 1,
            Severity::Info => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized vulnerability/issue record.
///
/// Field names follow the camelCase wire contract the model is prompted
/// with. Instances are only ever constructed by the validator, which
/// guarantees the invariants: non-empty `rule_id` and `name`, a severity
/// from the five-value scale, and `1 <= line_number <= file line count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Unique within one analysis call: `{fileName}-{index}-{timestamp}`.
    pub id: String,
    /// CVE/CWE/OWASP identifier, e.g. `CWE-79`.
    pub rule_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    pub line_number: u32,
    /// MITRE ATT&CK technique id, e.g. `T1059`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitre_technique: Option<String>,
    #[serde(default)]
    pub fix_suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_code: Option<String>,
    pub file_name: String,
}
