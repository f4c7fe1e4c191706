use std::fmt::Write;

use argus_core::BatchReport;
use argus_core::folder_risk_score;
use argus_core::project_average;
use serde_json::json;

/// Human-readable report: findings per file, then the two project
/// aggregates (average for the summary, worst file for the badge).
pub fn render_text(project_name: &str, batch: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analysis of {project_name}");
    let _ = writeln!(out);

    for result in &batch.results {
        let _ = writeln!(
            out,
            "{} — risk {}/100, {} finding(s)",
            result.file_name,
            result.risk_score,
            result.findings.len()
        );
        for finding in &result.findings {
            let _ = writeln!(
                out,
                "  [{}] {} {} (line {})",
                finding.severity, finding.rule_id, finding.name, finding.line_number
            );
            if !finding.fix_suggestion.is_empty() {
                let _ = writeln!(out, "      fix: {}", finding.fix_suggestion);
            }
        }
    }

    let scores: Vec<u8> = batch.results.iter().map(|r| r.risk_score).collect();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} file(s) analyzed, {} failed, {} finding(s) total",
        batch.success_count,
        batch.failed_files.len(),
        batch.total_findings
    );
    let _ = writeln!(
        out,
        "project risk: average {}/100, worst file {}/100",
        project_average(&scores),
        folder_risk_score(scores.iter().copied())
    );
    if let Some(fatal) = &batch.fatal {
        let _ = writeln!(out, "stopped early: {fatal}");
    }
    out
}

pub fn render_json(project_name: &str, batch: &BatchReport) -> String {
    let scores: Vec<u8> = batch.results.iter().map(|r| r.risk_score).collect();
    let value = json!({
        "projectName": project_name,
        "files": batch.results,
        "successCount": batch.success_count,
        "failedFiles": batch.failed_files,
        "totalFindings": batch.total_findings,
        "averageRisk": project_average(&scores),
        "worstFileRisk": folder_risk_score(scores.iter().copied()),
        "fatal": batch.fatal.as_ref().map(|err| err.to_string()),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
