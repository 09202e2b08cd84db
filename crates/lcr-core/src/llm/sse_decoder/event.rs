//! SSE event type

/// One dispatched SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the `event:` field, if any
    pub event_type: Option<String>,
    /// Concatenated `data:` lines
    pub data: String,
}

impl SseEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: None,
            data: data.into(),
        }
    }

    /// The `[DONE]` terminator of OpenAI-compatible streams
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}
