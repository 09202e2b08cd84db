//! Server-Sent Events decoder for streamed chat completions
//!
//! Network chunks may end in the middle of an event or in the middle of a
//! multi-byte UTF-8 character; both are buffered until the next chunk.

mod event;

pub use event::SseEvent;

/// Buffered SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Decoded text not yet terminated by a blank line
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending_bytes: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.pending_bytes.extend_from_slice(chunk);
        let bytes = std::mem::take(&mut self.pending_bytes);

        match std::str::from_utf8(&bytes) {
            Ok(text) => self.buffer.push_str(text),
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                // valid_up_to is a char boundary by definition
                self.buffer
                    .push_str(&String::from_utf8_lossy(&bytes[..valid_up_to]));
                match e.error_len() {
                    // incomplete sequence at the end: keep for the next chunk
                    None => self.pending_bytes = bytes[valid_up_to..].to_vec(),
                    Some(bad) => {
                        tracing::warn!(position = valid_up_to, "invalid UTF-8 in event stream");
                        self.buffer.push('\u{fffd}');
                        let rest = bytes[valid_up_to + bad..].to_vec();
                        return self.feed(&rest);
                    }
                }
            }
        }

        self.drain_events()
    }

    /// Flush whatever is left once the byte stream has ended
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.pending_bytes.is_empty() {
            let rest = std::mem::take(&mut self.pending_bytes);
            self.buffer.push_str(&String::from_utf8_lossy(&rest));
        }
        let text = std::mem::take(&mut self.buffer);
        parse_event(&text)
    }

    fn drain_events(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        while let Some((end, delimiter_len)) = self.next_boundary() {
            let text: String = self.buffer.drain(..end + delimiter_len).collect();
            if let Some(event) = parse_event(&text[..end]) {
                events.push(event);
            }
        }
        events
    }

    /// Position and length of the first blank-line delimiter
    fn next_boundary(&self) -> Option<(usize, usize)> {
        let lf = self.buffer.find("\n\n").map(|pos| (pos, 2));
        let crlf = self.buffer.find("\r\n\r\n").map(|pos| (pos, 4));
        match (lf, crlf) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        }
    }
}

fn parse_event(text: &str) -> Option<SseEvent> {
    let mut event_type = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        } else if let Some(value) = line.strip_prefix("event:") {
            event_type = Some(value.trim().to_string());
        }
        // id:, retry: and unknown fields carry nothing we use
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(SseEvent {
        event_type,
        data: data_lines.join("\n"),
    })
}
