//! Models file loading
//!
//! ```yaml
//! models:
//!   - name: gpt-4.1
//!     base_url: https://api.openai.com/v1
//!     api_key: ${OPENAI_API_KEY}
//!     temperature: 0.0
//!     max_tokens: 4096
//!     extra_body:
//!       reasoning_effort: high
//! ```

use super::defaults::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use super::model::ModelEndpointConfig;
use crate::error::{EvalError, EvalResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Named model endpoints loaded from a models file
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelEndpointConfig>,
}

impl ModelRegistry {
    /// Look up a model by name; a missing model is a fatal configuration error
    pub fn get(&self, name: &str) -> EvalResult<&ModelEndpointConfig> {
        self.models.get(name).ok_or_else(|| {
            EvalError::config_with_context(
                format!("Model '{}' not found in models file", name),
                format!("Known models: {}", self.names().join(", ")),
            )
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Sorted model names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn insert(&mut self, config: ModelEndpointConfig) {
        self.models.insert(config.model_id.clone(), config);
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawModelEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    extra_body: Option<serde_yaml::Value>,
    #[serde(default)]
    max_tokens: Option<u32>,
}

/// Load and validate a models file
pub fn load_models_file(path: &Path) -> EvalResult<ModelRegistry> {
    if !path.exists() {
        return Err(EvalError::config(format!(
            "Models file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        EvalError::config_with_context(
            format!("Failed to read models file: {}", e),
            format!("Reading models from '{}'", path.display()),
        )
    })?;

    parse_models_yaml(&content).map_err(|e| match e {
        EvalError::Config { message, context } => EvalError::Config {
            message,
            context: context.or_else(|| Some(format!("Loading '{}'", path.display()))),
        },
        other => other,
    })
}

/// Parse the YAML body of a models file.
///
/// Entries without a name are ignored. A named entry without `base_url` or
/// `api_key` is rejected.
pub fn parse_models_yaml(content: &str) -> EvalResult<ModelRegistry> {
    let root: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| EvalError::config(format!("Failed to parse YAML models file: {}", e)))?;

    let entries = match root.get("models") {
        None | Some(serde_yaml::Value::Null) => return Ok(ModelRegistry::default()),
        Some(serde_yaml::Value::Sequence(entries)) => entries,
        Some(_) => return Err(EvalError::config("Invalid models list: expected a sequence")),
    };

    let mut registry = ModelRegistry::default();
    for entry in entries {
        if !entry.is_mapping() {
            continue;
        }
        let raw: RawModelEntry = serde_yaml::from_value(entry.clone())
            .map_err(|e| EvalError::config(format!("Invalid model entry: {}", e)))?;

        let name = raw.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let api_key = raw.api_key.as_deref().map(str::trim).unwrap_or_default();
        if api_key.is_empty() {
            return Err(EvalError::config(format!("Missing api_key for model {}", name)));
        }

        let base_url = raw.base_url.as_deref().map(str::trim).unwrap_or_default();
        if base_url.is_empty() {
            return Err(EvalError::config(format!("Missing base_url for model {}", name)));
        }

        let extra_body = raw.extra_body.and_then(|body| match serde_json::to_value(&body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        });

        registry.insert(ModelEndpointConfig {
            model_id: name.to_string(),
            temperature: raw.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            base_url: base_url.to_string(),
            api_key: expand_env_vars(api_key)?,
            extra_body,
            max_tokens: raw.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });
    }

    Ok(registry)
}

/// Expand `${VAR}` references; an unset variable is a configuration error
pub fn expand_env_vars(value: &str) -> EvalResult<String> {
    shellexpand::env(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| EvalError::config(format!("Env var {} not set", e.var_name)))
}
