//! Tokenizer oracles

/// Turns text into a token count. Treated as exact and synchronous.
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

/// Character-ratio estimate: `ceil(chars / chars_per_token)`
#[derive(Debug, Clone, Copy)]
pub struct CharRatioTokenizer {
    chars_per_token: f32,
}

impl CharRatioTokenizer {
    pub fn new() -> Self {
        Self {
            chars_per_token: 4.0,
        }
    }

    /// Create with custom chars per token estimate
    pub fn with_chars_per_token(mut self, chars_per_token: f32) -> Self {
        if chars_per_token > 0.0 {
            self.chars_per_token = chars_per_token;
        }
        self
    }
}

impl Default for CharRatioTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for CharRatioTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        let chars = text.chars().count();
        (chars as f32 / self.chars_per_token).ceil() as usize
    }
}

/// Exact `cl100k_base` byte-pair encoding
#[cfg(feature = "tiktoken")]
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tiktoken")]
impl TiktokenTokenizer {
    pub fn cl100k() -> crate::error::EvalResult<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| {
            crate::error::EvalError::config(format!("Failed to load cl100k_base: {}", e))
        })?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tiktoken")]
impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
