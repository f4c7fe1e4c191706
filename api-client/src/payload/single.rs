use argus_provider_config::ProviderId;
use serde_json::Value;
use serde_json::json;

use crate::error::Result;
use crate::payload::PayloadBuilder;
use crate::prompt::system_prompt;
use crate::prompt::user_prompt;

/// Flat single-prompt payload for generate-style providers. The envelope
/// differs between gemini's `generateContent` and ollama's `generate`, but
/// both take one prompt string instead of a message list.
pub(crate) struct SinglePromptPayloadBuilder {
    provider: ProviderId,
    model: String,
    supports_structured_output: bool,
}

impl SinglePromptPayloadBuilder {
    pub(crate) fn new(
        provider: ProviderId,
        model: String,
        supports_structured_output: bool,
    ) -> Self {
        Self {
            provider,
            model,
            supports_structured_output,
        }
    }
}

impl PayloadBuilder for SinglePromptPayloadBuilder {
    fn build(&self, file_name: &str, source: &str) -> Result<Value> {
        let prompt = format!(
            "{}\n\n{}",
            system_prompt(self.supports_structured_output),
            user_prompt(file_name, source)
        );

        match self.provider {
            ProviderId::Gemini => Ok(json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": prompt }] }
                ],
                "generationConfig": { "responseMimeType": "application/json" },
            })),
            _ => Ok(json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "format": "json",
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gemini_payload_uses_generate_content_envelope() {
        let builder = SinglePromptPayloadBuilder::new(
            ProviderId::Gemini,
            "gemini-2.0-flash-exp".to_string(),
            true,
        );
        let payload = builder.build("app.py", "print('hi')").expect("build");
        assert_eq!(
            payload["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let text = payload["contents"][0]["parts"][0]["text"]
            .as_str()
            .expect("prompt text");
        assert!(text.contains("Analyze this file: app.py"));
    }

    #[test]
    fn ollama_payload_disables_streaming_and_forces_json() {
        let builder =
            SinglePromptPayloadBuilder::new(ProviderId::Ollama, "llama3".to_string(), true);
        let payload = builder.build("app.py", "print('hi')").expect("build");
        assert_eq!(payload["model"], "llama3");
        assert_eq!(payload["stream"], false);
        assert_eq!(payload["format"], "json");
        assert!(
            payload["prompt"]
                .as_str()
                .expect("prompt")
                .contains("app.py")
        );
    }
}
