use std::collections::HashMap;
use std::sync::Arc;

use argus_api_client::Error;
use argus_api_client::Result;
use argus_api_client::Transport;
use argus_api_client::build_request;
use argus_api_client::decode_content;
use argus_api_client::extract_findings;
use argus_protocol::ActivityKind;
use argus_protocol::ActivityRecord;
use argus_protocol::FileAnalysisResult;
use argus_protocol::ProjectHistoryRecord;
use argus_protocol::ProjectType;
use argus_protocol::SourceFile;
use argus_provider_config::ProviderId;
use argus_provider_config::ProviderProfile;
use argus_provider_config::built_in_profiles;
use chrono::Utc;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::score::risk_score;
use crate::sinks::ActivitySink;
use crate::sinks::HistorySink;
use crate::validate::validate_findings;

/// Outcome of a batch run. Completed results and the fatal error travel
/// together: a credential failure halfway through still leaves the earlier
/// files' results usable.
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<FileAnalysisResult>,
    pub success_count: usize,
    /// Files that failed with a file-local error and were recorded with
    /// zero findings.
    pub failed_files: Vec<String>,
    pub total_findings: usize,
    /// Set when a batch-fatal error stopped the run; files after the
    /// failing one were never attempted and have no entry in `results`.
    pub fatal: Option<Error>,
}

/// Sequences provider dispatch for single-file and batch analysis.
///
/// Owns nothing long-lived: every call takes an explicit [`AnalysisConfig`]
/// and returns immutable results for the caller to apply. Batch runs are
/// strictly sequential — one in-flight provider call at a time — and are
/// never retried automatically.
pub struct Orchestrator {
    profiles: HashMap<ProviderId, ProviderProfile>,
    transport: Arc<dyn Transport>,
    history: Option<Arc<dyn HistorySink>>,
    activity: Option<Arc<dyn ActivitySink>>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            profiles: built_in_profiles(),
            transport,
            history: None,
            activity: None,
        }
    }

    /// Replaces a provider profile, e.g. with a TOML-supplied override.
    pub fn with_profile(mut self, profile: ProviderProfile) -> Self {
        self.profiles.insert(profile.id, profile);
        self
    }

    pub fn with_history_sink(mut self, sink: Arc<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    pub fn with_activity_sink(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.activity = Some(sink);
        self
    }

    fn profile(&self, id: ProviderId) -> ProviderProfile {
        self.profiles
            .get(&id)
            .cloned()
            .unwrap_or_else(|| argus_provider_config::profile_for(id))
    }

    /// Analyzes a single file end to end. Every error propagates to the
    /// caller typed; batch policy does not apply here.
    pub async fn analyze_file(
        &self,
        config: &AnalysisConfig,
        file: &SourceFile,
    ) -> Result<FileAnalysisResult> {
        let profile = self.profile(config.provider);
        let request = config.request_for(file);
        let descriptor = build_request(&request, &profile)?;

        debug!(file = file.name.as_str(), provider = %profile.id, "dispatching analysis request");
        let response = self.transport.execute(&descriptor).await?;
        let body = response.into_body()?;
        let content = decode_content(&profile, &body)?;

        let extraction = extract_findings(&content)?;
        if extraction.used_fallback {
            warn!(
                file = file.name.as_str(),
                "provider response needed a degraded recovery strategy"
            );
        }

        let stamp = Utc::now().timestamp_millis();
        let validated =
            validate_findings(extraction.objects, &file.name, file.line_count(), stamp);
        let score = risk_score(&validated.findings);

        Ok(FileAnalysisResult {
            file_name: file.name.clone(),
            findings: validated.findings,
            risk_score: score,
        })
    }

    /// Analyzes every file in order. Credential and model errors stop the
    /// batch — the same key will fail for every remaining file; anything
    /// else marks the one file as failed with zero findings and the batch
    /// continues.
    pub async fn analyze_project(
        &self,
        config: &AnalysisConfig,
        project_name: &str,
        files: &[SourceFile],
    ) -> BatchReport {
        self.emit_activity(ActivityRecord {
            kind: ActivityKind::AnalysisStarted,
            project_name: project_name.to_string(),
            provider: config.provider.to_string(),
            model: config.model.clone(),
            file_count: files.len(),
            vulnerability_count: None,
        })
        .await;

        let mut report = BatchReport {
            results: Vec::with_capacity(files.len()),
            success_count: 0,
            failed_files: Vec::new(),
            total_findings: 0,
            fatal: None,
        };
        let mut lines_processed = 0usize;

        for (index, file) in files.iter().enumerate() {
            debug!(
                file = file.name.as_str(),
                current = index + 1,
                total = files.len(),
                "scanning"
            );
            match self.analyze_file(config, file).await {
                Ok(result) => {
                    lines_processed += file.line_count() as usize;
                    report.success_count += 1;
                    report.results.push(result);
                }
                Err(err) if err.is_batch_fatal() => {
                    error!(
                        file = file.name.as_str(),
                        %err,
                        "credential or model error, stopping batch"
                    );
                    report.fatal = Some(err);
                    break;
                }
                Err(err) => {
                    warn!(file = file.name.as_str(), %err, "file analysis failed, continuing");
                    lines_processed += file.line_count() as usize;
                    report.failed_files.push(file.name.clone());
                    report.results.push(FileAnalysisResult::empty(&file.name));
                }
            }
        }

        report.total_findings = report.results.iter().map(|r| r.findings.len()).sum();

        if report.success_count > 0 {
            info!(
                project = project_name,
                analyzed = report.success_count,
                findings = report.total_findings,
                "analysis complete"
            );
            self.emit_history(ProjectHistoryRecord {
                project_name: project_name.to_string(),
                project_type: if files.len() == 1 {
                    ProjectType::File
                } else {
                    ProjectType::Folder
                },
                file_count: report.results.len(),
                line_count: lines_processed,
                vulnerability_count: report.total_findings,
                analyzed_at: Utc::now(),
            })
            .await;
            self.emit_activity(ActivityRecord {
                kind: ActivityKind::AnalysisCompleted,
                project_name: project_name.to_string(),
                provider: config.provider.to_string(),
                model: config.model.clone(),
                file_count: report.results.len(),
                vulnerability_count: Some(report.total_findings),
            })
            .await;
        }

        report
    }

    async fn emit_history(&self, record: ProjectHistoryRecord) {
        if let Some(sink) = &self.history
            && let Err(err) = sink.save_project_history(&record).await
        {
            warn!(%err, "failed to save project history");
        }
    }

    async fn emit_activity(&self, record: ActivityRecord) {
        if let Some(sink) = &self.activity
            && let Err(err) = sink.log_activity(&record).await
        {
            warn!(%err, "failed to log activity");
        }
    }
}
