//! Chat-completion client
//!
//! A single streaming call is accumulated by [`StreamAccumulator`] and
//! wrapped in the retry scheme of [`RetryPolicy`]; [`CompletionClient`] is
//! the reqwest implementation of the [`ChatCompletion`] seam.

mod client;
mod retry;
mod sse_decoder;
mod stream;
mod types;

pub use client::{ChatCompletion, CompletionClient, REQUEST_TIMEOUT, build_request_body};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use sse_decoder::{SseDecoder, SseEvent};
pub use stream::StreamAccumulator;
pub use types::{CompletionOutcome, TokenUsage};
