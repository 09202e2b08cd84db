//! Model endpoint configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Everything needed to call one chat-completion model.
///
/// One instance exists per role (task model, judge model) and it is never
/// mutated after loading.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEndpointConfig {
    /// Model identifier sent as `model` in the request
    pub model_id: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Base address, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer credential (already env-expanded)
    pub api_key: String,
    /// Provider-specific parameters merged into the request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_body: Option<Map<String, Value>>,
    /// Upper bound on completion tokens for this model
    pub max_tokens: u32,
}

impl ModelEndpointConfig {
    pub fn new(
        model_id: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            temperature: super::defaults::DEFAULT_TEMPERATURE,
            base_url: base_url.into(),
            api_key: api_key.into(),
            extra_body: None,
            max_tokens: super::defaults::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_extra_body(mut self, extra_body: Map<String, Value>) -> Self {
        self.extra_body = Some(extra_body);
        self
    }

    /// `{base_url}/chat/completions`, tolerating a trailing slash
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ModelEndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEndpointConfig")
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("extra_body", &self.extra_body)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Mask an API key for safe display
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..8].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
