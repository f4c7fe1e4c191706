use serde_json::Value;
use serde_json::json;

use crate::error::Result;
use crate::payload::PayloadBuilder;
use crate::prompt::system_prompt;
use crate::prompt::user_prompt;

/// OpenAI-compatible `messages` payload (openai, groq, deepseek).
pub(crate) struct ChatMessagesPayloadBuilder {
    model: String,
    supports_structured_output: bool,
}

impl ChatMessagesPayloadBuilder {
    pub(crate) fn new(model: String, supports_structured_output: bool) -> Self {
        Self {
            model,
            supports_structured_output,
        }
    }
}

impl PayloadBuilder for ChatMessagesPayloadBuilder {
    fn build(&self, file_name: &str, source: &str) -> Result<Value> {
        let messages = json!([
            {
                "role": "system",
                "content": system_prompt(self.supports_structured_output),
            },
            {
                "role": "user",
                "content": user_prompt(file_name, source),
            },
        ]);

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(object) = payload.as_object_mut() {
            if self.supports_structured_output {
                object.insert(
                    "response_format".to_string(),
                    json!({ "type": "json_object" }),
                );
            } else {
                // Lower temperature keeps the free-text JSON output stable.
                object.insert("temperature".to_string(), json!(0.3));
            }
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn structured_payload_requests_json_object() {
        let builder = ChatMessagesPayloadBuilder::new("gpt-4o-mini".to_string(), true);
        let payload = builder.build("main.rs", "fn main() {}").expect("build");
        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert!(payload.get("temperature").is_none());
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
    }

    #[test]
    fn freeform_payload_pins_temperature() {
        let builder = ChatMessagesPayloadBuilder::new("llama-3.1-8b-instant".to_string(), false);
        let payload = builder.build("main.rs", "fn main() {}").expect("build");
        assert_eq!(payload["temperature"], 0.3);
        assert!(payload.get("response_format").is_none());
        let system = payload["messages"][0]["content"]
            .as_str()
            .expect("system content");
        assert!(system.contains("raw JSON array"));
    }
}
