//! Token counting and budget enforcement

mod budget;
mod tokenizer;

pub use budget::TokenBudget;
#[cfg(feature = "tiktoken")]
pub use tokenizer::TiktokenTokenizer;
pub use tokenizer::{CharRatioTokenizer, Tokenizer};
