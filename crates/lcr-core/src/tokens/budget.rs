//! Token budget for prompts and completions

use super::Tokenizer;
use std::sync::Arc;

/// Wraps a tokenizer with the context window of a run
#[derive(Clone)]
pub struct TokenBudget {
    tokenizer: Arc<dyn Tokenizer>,
    context_length: usize,
}

impl TokenBudget {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, context_length: usize) -> Self {
        Self {
            tokenizer,
            context_length,
        }
    }

    pub fn context_length(&self) -> usize {
        self.context_length
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }

    /// Sum of the token counts of every text
    pub fn count_all<S: AsRef<str>>(&self, texts: &[S]) -> usize {
        texts
            .iter()
            .map(|text| self.tokenizer.count_tokens(text.as_ref()))
            .sum()
    }

    /// Whether the texts alone already exceed the context window
    pub fn exceeds_context(&self, tokens: usize) -> bool {
        tokens > self.context_length
    }

    /// `min(model_ceiling, max(0, context_length - prompt_tokens))`
    pub fn remaining_for(&self, prompt_tokens: usize, model_ceiling: u32) -> u32 {
        self.remaining_for_with_floor(prompt_tokens, model_ceiling, 0)
    }

    /// Like [`remaining_for`](Self::remaining_for) with a lower bound on the
    /// remaining budget before the model ceiling is applied
    pub fn remaining_for_with_floor(
        &self,
        prompt_tokens: usize,
        model_ceiling: u32,
        floor: usize,
    ) -> u32 {
        let remaining = self.context_length.saturating_sub(prompt_tokens).max(floor);
        let remaining = u32::try_from(remaining).unwrap_or(u32::MAX);
        remaining.min(model_ceiling)
    }
}

impl std::fmt::Debug for TokenBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBudget")
            .field("context_length", &self.context_length)
            .finish_non_exhaustive()
    }
}
