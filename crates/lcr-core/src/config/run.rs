//! Run configuration

use super::defaults::*;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Name of the model under test in the models file
    pub model_id: String,

    /// Name of the judge model in the models file
    #[serde(default = "default_judge_model_id")]
    pub judge_model_id: String,

    /// Path to the models file
    #[serde(default = "default_models_path")]
    pub models_path: PathBuf,

    /// Path to the question CSV
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Root of the extracted document texts
    #[serde(default = "default_documents_root")]
    pub documents_root: PathBuf,

    /// Explicit result file; derived from the model id when absent
    pub save_to: Option<PathBuf>,

    /// Maximum number of pending tasks to launch (None = all)
    pub num_tasks: Option<usize>,

    /// Size of the shared concurrency gate
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Attempts per model call
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Context window used for token budgeting
    #[serde(default = "default_context_length")]
    pub context_length: usize,
}

fn default_judge_model_id() -> String {
    DEFAULT_JUDGE_MODEL_ID.to_string()
}

fn default_models_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODELS_PATH)
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_PATH)
}

fn default_documents_root() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENTS_ROOT)
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_context_length() -> usize {
    DEFAULT_CONTEXT_LENGTH_TOKENS
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_id: default_judge_model_id(),
            judge_model_id: default_judge_model_id(),
            models_path: default_models_path(),
            dataset_path: default_dataset_path(),
            documents_root: default_documents_root(),
            save_to: None,
            num_tasks: None,
            max_concurrency: default_max_concurrency(),
            retries: default_retries(),
            context_length: default_context_length(),
        }
    }
}

impl RunConfig {
    /// Create a config for the given model under test
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    pub fn with_judge_model(mut self, judge_model_id: impl Into<String>) -> Self {
        self.judge_model_id = judge_model_id.into();
        self
    }

    pub fn with_save_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_to = Some(path.into());
        self
    }

    pub fn with_num_tasks(mut self, num_tasks: usize) -> Self {
        self.num_tasks = Some(num_tasks);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }

    /// The result file for this run: `save_to` if given, otherwise
    /// `results/<model id with '/' -> '__'>/<timestamp>.jsonl`
    pub fn result_path(&self, now: DateTime<Local>) -> PathBuf {
        match &self.save_to {
            Some(path) => path.clone(),
            None => default_result_path(Path::new(DEFAULT_RESULTS_DIR), &self.model_id, now),
        }
    }
}

fn default_result_path(results_dir: &Path, model_id: &str, now: DateTime<Local>) -> PathBuf {
    results_dir
        .join(model_id.replace('/', "__"))
        .join(format!("{}.jsonl", now.format("%Y%m%d_%H%M%S")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.context_length, 115_200);
        assert_eq!(config.max_concurrency, 20);
        assert_eq!(config.retries, 3);
        assert_eq!(config.judge_model_id, "doubao-seed-1-8-251228");
    }

    #[test]
    fn test_config_builder() {
        let config = RunConfig::new("org/model")
            .with_num_tasks(5)
            .with_max_concurrency(4)
            .with_retries(2);
        assert_eq!(config.model_id, "org/model");
        assert_eq!(config.num_tasks, Some(5));
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn test_result_path_derived_from_model_id() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let path = RunConfig::new("org/model").result_path(now);
        assert_eq!(
            path,
            PathBuf::from("results").join("org__model").join("20260304_050607.jsonl")
        );
    }

    #[test]
    fn test_explicit_save_to_wins() {
        let now = Local::now();
        let path = RunConfig::new("m").with_save_to("out.jsonl").result_path(now);
        assert_eq!(path, PathBuf::from("out.jsonl"));
    }
}
