//! Declarative provider configuration.
//!
//! Every supported LLM provider is described by a [`ProviderProfile`]: the
//! request shape it speaks, its context budget in characters, its default
//! model, and the lexical model markers used to guard against stale
//! cross-provider model selections. The request builder in
//! `argus-api-client` is driven entirely by this table; adding a provider
//! means adding a row, not code.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    Openai,
    Groq,
    Deepseek,
    Ollama,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Gemini,
        ProviderId::Openai,
        ProviderId::Groq,
        ProviderId::Deepseek,
        ProviderId::Ollama,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::Openai => "openai",
            ProviderId::Groq => "groq",
            ProviderId::Deepseek => "deepseek",
            ProviderId::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown provider `{0}`; expected one of gemini, openai, groq, deepseek, ollama")]
pub struct UnknownProviderError(String);

impl FromStr for ProviderId {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderId::Gemini),
            "openai" => Ok(ProviderId::Openai),
            "groq" => Ok(ProviderId::Groq),
            "deepseek" => Ok(ProviderId::Deepseek),
            "ollama" => Ok(ProviderId::Ollama),
            other => Err(UnknownProviderError(other.to_string())),
        }
    }
}

/// How the provider expects the analysis prompt to be packaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestShape {
    /// OpenAI-compatible `messages` array with system/user roles.
    #[default]
    ChatMessages,
    /// One flat prompt string (gemini `generateContent`, ollama `generate`).
    SinglePrompt,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("provider profile `{name}` has max_input_chars = 0")]
    ZeroInputBudget { name: String },
    #[error("provider profile `{name}` has an empty base_url")]
    EmptyBaseUrl { name: String },
}

/// Static per-provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: ProviderId,
    pub name: String,
    pub base_url: String,
    pub default_model: String,
    /// Upper bound on the number of source characters sent per request.
    /// Longer inputs are truncated by the request builder. Always > 0.
    pub max_input_chars: usize,
    #[serde(default)]
    pub request_shape: RequestShape,
    #[serde(default)]
    pub supports_structured_output: bool,
    #[serde(default)]
    pub requires_api_key: bool,
    /// Lexical fragments a model id for this provider is expected to
    /// contain. Empty means any model id is accepted.
    #[serde(default)]
    pub model_markers: Vec<String>,
}

impl ProviderProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.max_input_chars == 0 {
            return Err(ProfileError::ZeroInputBudget {
                name: self.name.clone(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(ProfileError::EmptyBaseUrl {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Picks the model for a request. A requested model that does not
    /// lexically match any of the provider's markers is assumed to be a
    /// stale selection from a different provider and is replaced by the
    /// default. This is a heuristic guard, not validation: the provider
    /// still has the final say on whether the model exists.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        match requested {
            Some(model) if !model.trim().is_empty() => {
                let lowered = model.to_ascii_lowercase();
                if self.model_markers.is_empty()
                    || self.model_markers.iter().any(|m| lowered.contains(m))
                {
                    model.to_string()
                } else {
                    warn!(
                        provider = %self.id,
                        requested = model,
                        fallback = %self.default_model,
                        "model does not match provider, using default"
                    );
                    self.default_model.clone()
                }
            }
            _ => self.default_model.clone(),
        }
    }

    /// Full request URL for this provider. `endpoint_override` replaces the
    /// base URL and exists for locally hosted providers.
    pub fn request_url(
        &self,
        model: &str,
        endpoint_override: Option<&str>,
        api_key: Option<&str>,
    ) -> String {
        let base = endpoint_override
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(&self.base_url)
            .trim_end_matches('/');

        match self.id {
            ProviderId::Gemini => {
                let key = api_key.unwrap_or_default();
                format!("{base}/models/{model}:generateContent?key={key}")
            }
            ProviderId::Ollama => format!("{base}/api/generate"),
            ProviderId::Openai | ProviderId::Groq | ProviderId::Deepseek => {
                format!("{base}/chat/completions")
            }
        }
    }
}

/// The built-in provider table. Context budgets are deliberately
/// conservative fractions of each provider's advertised token window.
pub fn built_in_profiles() -> HashMap<ProviderId, ProviderProfile> {
    use ProviderProfile as P;

    [
        P {
            id: ProviderId::Gemini,
            name: "Google Gemini".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            default_model: "gemini-2.0-flash-exp".into(),
            max_input_chars: 30_000,
            request_shape: RequestShape::SinglePrompt,
            supports_structured_output: true,
            requires_api_key: true,
            model_markers: vec!["gemini".into()],
        },
        P {
            id: ProviderId::Openai,
            name: "OpenAI".into(),
            base_url: "https://api.openai.com/v1".into(),
            default_model: "gpt-4o-mini".into(),
            max_input_chars: 200_000,
            request_shape: RequestShape::ChatMessages,
            supports_structured_output: true,
            requires_api_key: true,
            model_markers: vec!["gpt".into(), "o1".into()],
        },
        P {
            id: ProviderId::Groq,
            name: "Groq".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            default_model: "llama-3.1-8b-instant".into(),
            max_input_chars: 100_000,
            request_shape: RequestShape::ChatMessages,
            supports_structured_output: false,
            requires_api_key: true,
            model_markers: vec!["llama".into(), "mixtral".into(), "qwen".into()],
        },
        P {
            id: ProviderId::Deepseek,
            name: "DeepSeek".into(),
            base_url: "https://api.deepseek.com".into(),
            default_model: "deepseek-chat".into(),
            max_input_chars: 80_000,
            request_shape: RequestShape::ChatMessages,
            supports_structured_output: false,
            requires_api_key: true,
            model_markers: vec!["deepseek".into()],
        },
        P {
            id: ProviderId::Ollama,
            name: "Ollama".into(),
            base_url: "http://localhost:11434".into(),
            default_model: "llama3".into(),
            max_input_chars: 50_000,
            request_shape: RequestShape::SinglePrompt,
            supports_structured_output: true,
            requires_api_key: false,
            model_markers: Vec::new(),
        },
    ]
    .into_iter()
    .map(|p| (p.id, p))
    .collect()
}

/// Convenience lookup into the built-in table.
pub fn profile_for(id: ProviderId) -> ProviderProfile {
    let mut profiles = built_in_profiles();
    profiles
        .remove(&id)
        .unwrap_or_else(|| unreachable!("built-in table covers every ProviderId"))
}
