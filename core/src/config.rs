use argus_api_client::AnalysisRequest;
use argus_protocol::SourceFile;
use argus_provider_config::ProviderId;
use serde::Deserialize;
use serde::Serialize;

/// Explicit analysis configuration, passed into every orchestrator call.
/// There is no ambient settings state anywhere in the pipeline: whoever
/// invokes the orchestrator decides provider, credentials, and model for
/// that run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub provider: ProviderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base-URL override for locally hosted providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AnalysisConfig {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            api_key: None,
            endpoint: None,
            model: None,
        }
    }

    pub(crate) fn request_for(&self, file: &SourceFile) -> AnalysisRequest {
        AnalysisRequest {
            provider: self.provider,
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            file_name: file.name.clone(),
            source_text: file.content.clone(),
        }
    }
}
