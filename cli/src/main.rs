mod report;
mod sinks;
mod sources;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use argus_api_client::HttpTransport;
use argus_core::AnalysisConfig;
use argus_core::Orchestrator;
use argus_provider_config::ProviderId;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::sinks::JsonlHistorySink;
use crate::sinks::LogActivitySink;
use crate::sources::collect_files;

/// Audit source files with an LLM provider and report the findings.
#[derive(Debug, Parser)]
#[command(name = "argus", version, about)]
struct Cli {
    /// Files or directories to analyze (directories are walked
    /// gitignore-aware).
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Provider to use; falls back to the config file.
    #[arg(long, value_parser = clap::value_parser!(ProviderId))]
    provider: Option<ProviderId>,

    /// Model override; mismatched selections fall back to the provider
    /// default.
    #[arg(long)]
    model: Option<String>,

    /// API key; the ARGUS_API_KEY environment variable is used when
    /// omitted.
    #[arg(long, env = "ARGUS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Endpoint override for locally hosted providers.
    #[arg(long)]
    endpoint: Option<String>,

    /// TOML config file with provider settings.
    #[arg(long, default_value = "argus.toml")]
    config: PathBuf,

    /// Project name used in the report and history records.
    #[arg(long)]
    project_name: Option<String>,

    /// History file to append one JSON record per completed run.
    #[arg(long, default_value = ".argus_history.jsonl")]
    history: PathBuf,

    /// Print the full report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Resolves the effective analysis configuration: CLI flags win over
    /// the config file; the config file is optional unless it is the only
    /// source of a provider.
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let file_config: Option<AnalysisConfig> = match std::fs::read_to_string(&self.config) {
            Ok(text) => Some(
                toml::from_str(&text)
                    .with_context(|| format!("invalid config file {}", self.config.display()))?,
            ),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("cannot read {}", self.config.display()));
            }
        };

        let provider = match (self.provider, file_config.as_ref().map(|c| c.provider)) {
            (Some(provider), _) => provider,
            (None, Some(provider)) => provider,
            (None, None) => bail!(
                "no provider selected; pass --provider or create {}",
                self.config.display()
            ),
        };

        let file_config = file_config.unwrap_or_else(|| AnalysisConfig::new(provider));
        Ok(AnalysisConfig {
            provider,
            api_key: self.api_key.clone().or(file_config.api_key),
            endpoint: self.endpoint.clone().or(file_config.endpoint),
            model: self.model.clone().or(file_config.model),
        })
    }

    fn project_name(&self) -> String {
        if let Some(name) = &self.project_name {
            return name.clone();
        }
        self.paths
            .first()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.analysis_config()?;

    let files = collect_files(&cli.paths)?;
    if files.is_empty() {
        bail!("no readable source files found under the given paths");
    }

    let orchestrator = Orchestrator::new(Arc::new(HttpTransport::new()))
        .with_history_sink(Arc::new(JsonlHistorySink::new(cli.history.clone())))
        .with_activity_sink(Arc::new(LogActivitySink));

    let project_name = cli.project_name();
    let batch = orchestrator
        .analyze_project(&config, &project_name, &files)
        .await;

    if cli.json {
        println!("{}", report::render_json(&project_name, &batch));
    } else {
        print!("{}", report::render_text(&project_name, &batch));
    }

    if let Some(fatal) = &batch.fatal {
        bail!("{fatal} — check your provider settings (API key, model, endpoint)");
    }
    Ok(())
}
