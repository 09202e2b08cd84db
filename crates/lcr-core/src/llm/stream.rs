//! Folding streamed chunks into one completion

use super::sse_decoder::SseEvent;
use super::types::{CompletionOutcome, TokenUsage};
use crate::error::{EvalError, EvalResult};
use serde_json::Value;

/// Accumulates one streamed response.
///
/// Content deltas are appended in arrival order. Usage is taken from the
/// last usage-bearing chunk: a later report replaces an earlier one.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    usage: TokenUsage,
    chunks: usize,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one SSE event. A payload that is not valid JSON, or an error
    /// object sent in-stream, fails the attempt.
    pub fn push_event(&mut self, event: &SseEvent) -> EvalResult<()> {
        if event.is_done() {
            self.done = true;
            return Ok(());
        }

        let chunk: Value = serde_json::from_str(&event.data).map_err(|e| {
            EvalError::transient(format!("Malformed stream chunk: {} ({})", e, event.data))
        })?;
        self.push_chunk(&chunk)
    }

    /// Apply one decoded `chat.completion.chunk` object
    pub fn push_chunk(&mut self, chunk: &Value) -> EvalResult<()> {
        if let Some(error) = chunk.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(EvalError::transient(format!("Stream error: {}", message)));
        }

        self.chunks += 1;

        let content = chunk
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("delta"))
            .and_then(|delta| delta.get("content"))
            .and_then(Value::as_str);
        if let Some(content) = content {
            self.text.push_str(content);
        }

        if let Some(usage) = chunk.get("usage").filter(|u| u.is_object()) {
            self.usage = TokenUsage {
                prompt_tokens: usage
                    .get("prompt_tokens")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
                completion_tokens: usage
                    .get("completion_tokens")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
            };
        }

        Ok(())
    }

    /// Whether the `[DONE]` terminator has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn finish(self) -> CompletionOutcome {
        CompletionOutcome {
            text: self.text,
            usage: self.usage,
        }
    }
}
