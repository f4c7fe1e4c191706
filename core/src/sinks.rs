use argus_protocol::ActivityRecord;
use argus_protocol::ProjectHistoryRecord;
use async_trait::async_trait;

/// Persists a batch-level history record after a run completes.
///
/// Fire-and-forget: the orchestrator logs failures and moves on; a broken
/// sink never fails an analysis.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn save_project_history(&self, record: &ProjectHistoryRecord) -> anyhow::Result<()>;
}

/// Receives activity-log entries around a batch run. Same fire-and-forget
/// contract as [`HistorySink`].
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn log_activity(&self, record: &ActivityRecord) -> anyhow::Result<()>;
}
