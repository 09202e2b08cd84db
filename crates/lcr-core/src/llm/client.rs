//! Streaming chat-completion client for OpenAI-compatible endpoints

use super::retry::{RetryPolicy, retry_with_backoff};
use super::sse_decoder::SseDecoder;
use super::stream::StreamAccumulator;
use super::types::CompletionOutcome;
use crate::config::ModelEndpointConfig;
use crate::error::{EvalError, EvalResult};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::instrument;

/// Connect timeout and longest allowed silence while reading a response.
/// A stream that keeps producing chunks is never cut off.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// One chat-completion exchange with bounded retries.
///
/// Implementations must return a terminal failure after `retries` attempts
/// have been used up.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        endpoint: &ModelEndpointConfig,
        prompt: &str,
        max_tokens: u32,
        retries: u32,
    ) -> EvalResult<CompletionOutcome>;
}

/// reqwest-backed [`ChatCompletion`]
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http_client: Client,
    retry_policy: RetryPolicy,
}

impl CompletionClient {
    pub fn new() -> EvalResult<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Bounds connecting and each gap between received chunks by `timeout`.
    pub fn with_timeout(timeout: Duration) -> EvalResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| EvalError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// A single streamed attempt. Every failure is reported as transient.
    #[instrument(skip(self, endpoint, prompt), fields(model = %endpoint.model_id), level = "debug")]
    pub async fn attempt(
        &self,
        endpoint: &ModelEndpointConfig,
        prompt: &str,
        max_tokens: u32,
    ) -> EvalResult<CompletionOutcome> {
        let body = build_request_body(endpoint, prompt, max_tokens);

        let response = self
            .http_client
            .post(endpoint.completions_url())
            .bearer_auth(&endpoint.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EvalError::transient(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvalError::transient_with_status(
                format!("API error (status {}): {}", status, error_text),
                status.as_u16(),
            ));
        }

        let mut byte_stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut accumulator = StreamAccumulator::new();

        'stream: while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|e| EvalError::transient(format!("Stream error: {}", e)))?;
            for event in decoder.feed(&chunk) {
                accumulator.push_event(&event)?;
                if accumulator.is_done() {
                    break 'stream;
                }
            }
        }
        if !accumulator.is_done() {
            if let Some(event) = decoder.finish() {
                accumulator.push_event(&event)?;
            }
        }

        tracing::debug!(chunks = accumulator.chunk_count(), "stream finished");
        Ok(accumulator.finish())
    }
}

#[async_trait]
impl ChatCompletion for CompletionClient {
    async fn complete(
        &self,
        endpoint: &ModelEndpointConfig,
        prompt: &str,
        max_tokens: u32,
        retries: u32,
    ) -> EvalResult<CompletionOutcome> {
        let outcome = retry_with_backoff(&self.retry_policy, retries, |_| {
            self.attempt(endpoint, prompt, max_tokens)
        })
        .await?;

        tracing::info!(
            model = %endpoint.model_id,
            prompt_tokens = outcome.usage.prompt_tokens,
            completion_tokens = outcome.usage.completion_tokens,
            "completion finished"
        );
        Ok(outcome)
    }
}

/// Request body for a streamed completion; `extra_body` keys are merged at
/// the top level and win over the defaults.
pub fn build_request_body(endpoint: &ModelEndpointConfig, prompt: &str, max_tokens: u32) -> Value {
    let mut body = json!({
        "model": endpoint.model_id,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": endpoint.temperature,
        "max_tokens": max_tokens,
        "stream": true,
        "stream_options": {"include_usage": true},
    });

    if let (Some(extra), Value::Object(map)) = (&endpoint.extra_body, &mut body) {
        for (key, value) in extra {
            map.insert(key.clone(), value.clone());
        }
    }

    body
}
