use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::finding::Finding;

/// A source file handed to the pipeline for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Total line count used for line-number clamping. An empty file still
    /// has one line, matching `split('\n')` semantics.
    pub fn line_count(&self) -> u32 {
        self.content.split('\n').count() as u32
    }
}

/// Outcome of analyzing one file: the validated findings plus the
/// severity-weighted risk score in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysisResult {
    pub file_name: String,
    pub findings: Vec<Finding>,
    pub risk_score: u8,
}

impl FileAnalysisResult {
    /// Placeholder for a file whose provider call failed with a
    /// file-local error.
    pub fn empty(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            findings: Vec::new(),
            risk_score: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    File,
    Folder,
}

/// Record persisted after a completed batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHistoryRecord {
    pub project_name: String,
    pub project_type: ProjectType,
    pub file_count: usize,
    pub line_count: usize,
    pub vulnerability_count: usize,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    AnalysisStarted,
    AnalysisCompleted,
}

/// Activity-log entry emitted around a batch run. Consumed by an injected
/// sink; the pipeline never reads these back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub kind: ActivityKind,
    pub project_name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub file_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_count_counts_trailing_segment() {
        assert_eq!(SourceFile::new("a", "").line_count(), 1);
        assert_eq!(SourceFile::new("a", "one").line_count(), 1);
        assert_eq!(SourceFile::new("a", "one\ntwo").line_count(), 2);
        assert_eq!(SourceFile::new("a", "one\ntwo\n").line_count(), 3);
    }

    #[test]
    fn empty_result_has_zero_risk() {
        let result = FileAnalysisResult::empty("lib.rs");
        assert_eq!(result.risk_score, 0);
        assert!(result.findings.is_empty());
    }
}
