use argus_protocol::Finding;

/// Severity-weighted risk score for one file, clamped to `0..=100`.
pub fn risk_score(findings: &[Finding]) -> u8 {
    let total: u32 = findings.iter().map(|f| f.severity.risk_weight()).sum();
    total.min(100) as u8
}

/// Folder badge aggregation: the worst child file wins. Deliberately a
/// different formula from [`project_average`]; the two serve different
/// surfaces and are not reconciled.
pub fn folder_risk_score(child_scores: impl IntoIterator<Item = u8>) -> u8 {
    child_scores.into_iter().max().unwrap_or(0)
}

/// Dashboard aggregation: arithmetic mean over all file scores, rounded to
/// the nearest integer. Zero when there are no files.
pub fn project_average(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    (f64::from(sum) / scores.len() as f64).round() as u8
}
