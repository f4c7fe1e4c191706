use argus_provider_config::ProviderId;
use argus_provider_config::ProviderProfile;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;

/// Pulls the model's text out of a provider's HTTP response envelope.
///
/// The envelopes are third-party shapes outside this crate's control, so
/// every access is defensive; a missing or empty content field is an
/// unparseable response, not a panic.
pub fn decode_content(profile: &ProviderProfile, body: &str) -> Result<String> {
    let envelope: Value = serde_json::from_str(body)?;

    let content = match profile.id {
        ProviderId::Gemini => gemini_text(&envelope),
        ProviderId::Ollama => envelope
            .get("response")
            .and_then(Value::as_str)
            .map(str::to_string),
        ProviderId::Openai | ProviderId::Groq | ProviderId::Deepseek => envelope
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    content
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::UnparseableResponse {
            reason: format!("{} response carried no content", profile.id),
        })
}

fn gemini_text(envelope: &Value) -> Option<String> {
    let parts = envelope
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let mut text = String::new();
    for part in parts {
        if let Some(fragment) = part.get("text").and_then(Value::as_str) {
            text.push_str(fragment);
        }
    }
    Some(text)
}
