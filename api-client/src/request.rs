use argus_provider_config::ProviderId;
use argus_provider_config::ProviderProfile;
use argus_provider_config::RequestShape;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::payload::ChatMessagesPayloadBuilder;
use crate::payload::PayloadBuilder;
use crate::payload::SinglePromptPayloadBuilder;
use crate::prompt::truncate_source;

/// One analysis call against one provider. Constructed by the orchestrator
/// per file from the explicit analysis configuration; consumed once.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub provider: ProviderId,
    pub api_key: Option<String>,
    /// Base-URL override for locally hosted providers.
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub file_name: String,
    pub source_text: String,
}

/// Provider-ready request: everything the transport needs to perform the
/// HTTP call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Builds the provider request. Fails with [`Error::MissingCredential`]
/// before anything else when the provider requires an API key and none was
/// supplied; resolves the model through the profile's marker guard;
/// truncates oversized sources deterministically.
pub fn build_request(
    request: &AnalysisRequest,
    profile: &ProviderProfile,
) -> Result<RequestDescriptor> {
    let api_key = request
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty());
    if profile.requires_api_key && api_key.is_none() {
        return Err(Error::MissingCredential {
            provider: profile.id.to_string(),
        });
    }

    let model = profile.resolve_model(request.model.as_deref());
    let source = truncate_source(
        &request.source_text,
        profile.max_input_chars,
        &request.file_name,
    );

    let body = match profile.request_shape {
        RequestShape::ChatMessages => {
            ChatMessagesPayloadBuilder::new(model.clone(), profile.supports_structured_output)
                .build(&request.file_name, &source)?
        }
        RequestShape::SinglePrompt => SinglePromptPayloadBuilder::new(
            profile.id,
            model.clone(),
            profile.supports_structured_output,
        )
        .build(&request.file_name, &source)?,
    };

    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    match profile.id {
        ProviderId::Openai | ProviderId::Groq | ProviderId::Deepseek => {
            if let Some(key) = api_key {
                headers.push(("Authorization".to_string(), format!("Bearer {key}")));
            }
        }
        // Gemini authenticates via query parameter, ollama not at all.
        ProviderId::Gemini | ProviderId::Ollama => {}
    }

    let url = profile.request_url(&model, request.endpoint.as_deref(), api_key);
    Ok(RequestDescriptor { url, headers, body })
}
