//! Configuration for evaluation runs
//!
//! Model endpoints come from a YAML models file; everything else about a run
//! lives in [`RunConfig`].

mod defaults;
mod loader;
mod model;
mod run;

pub use defaults::{
    DEFAULT_CONTEXT_LENGTH_TOKENS, DEFAULT_DATASET_PATH, DEFAULT_DOCUMENTS_ROOT,
    DEFAULT_JUDGE_MODEL_ID, DEFAULT_MAX_CONCURRENCY, DEFAULT_MODELS_PATH, DEFAULT_RETRIES,
    DEFAULT_RESULTS_DIR,
};
pub use loader::{ModelRegistry, expand_env_vars, load_models_file, parse_models_yaml};
pub use model::{ModelEndpointConfig, mask_api_key};
pub use run::RunConfig;
