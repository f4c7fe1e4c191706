use std::io::Write;
use std::path::PathBuf;

use argus_core::ActivitySink;
use argus_core::HistorySink;
use argus_protocol::ActivityRecord;
use argus_protocol::ProjectHistoryRecord;
use async_trait::async_trait;
use tracing::info;

/// Appends one JSON line per completed run to a local history file.
pub struct JsonlHistorySink {
    path: PathBuf,
}

impl JsonlHistorySink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl HistorySink for JsonlHistorySink {
    async fn save_project_history(&self, record: &ProjectHistoryRecord) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Activity sink that just narrates to the log.
pub struct LogActivitySink;

#[async_trait]
impl ActivitySink for LogActivitySink {
    async fn log_activity(&self, record: &ActivityRecord) -> anyhow::Result<()> {
        info!(
            kind = ?record.kind,
            project = record.project_name.as_str(),
            provider = record.provider.as_str(),
            files = record.file_count,
            "activity"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_protocol::ProjectType;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn appends_one_json_line_per_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.jsonl");
        let sink = JsonlHistorySink::new(path.clone());

        let record = ProjectHistoryRecord {
            project_name: "demo".to_string(),
            project_type: ProjectType::Folder,
            file_count: 3,
            line_count: 120,
            vulnerability_count: 5,
            analyzed_at: Utc::now(),
        };
        sink.save_project_history(&record).await.expect("save");
        sink.save_project_history(&record).await.expect("save");

        let text = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: ProjectHistoryRecord = serde_json::from_str(lines[0]).expect("parse");
        assert_eq!(parsed.project_name, "demo");
        assert_eq!(parsed.vulnerability_count, 5);
    }
}
