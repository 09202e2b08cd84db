//! Default values for a benchmark run

/// 90% of a 128k context window
pub const DEFAULT_CONTEXT_LENGTH_TOKENS: usize = 115_200;

pub const DEFAULT_JUDGE_MODEL_ID: &str = "doubao-seed-1-8-251228";

pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

pub const DEFAULT_RETRIES: u32 = 3;

pub const DEFAULT_DATASET_PATH: &str = "dataset/AA-LCR_Dataset.csv";

pub const DEFAULT_DOCUMENTS_ROOT: &str = "dataset/AA-LCR_extracted-text";

pub const DEFAULT_MODELS_PATH: &str = "models.yaml";

pub const DEFAULT_RESULTS_DIR: &str = "results";

pub(crate) const DEFAULT_TEMPERATURE: f64 = 1.0;

pub(crate) const DEFAULT_MAX_TOKENS: u32 = 2048;
