//! Fixed-width statistics header

use crate::error::{EvalError, EvalResult};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Byte width of the header line, excluding the trailing newline
pub const HEADER_WIDTH: usize = 200;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Running counters of a result file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsHeader {
    pub correct: u64,
    pub total: u64,
}

#[derive(Serialize, Deserialize)]
struct HeaderLine {
    #[serde(rename = "_meta_stats")]
    meta_stats: bool,
    accuracy: String,
    correct: u64,
    total: u64,
    updated_at: String,
}

impl StatsHeader {
    pub fn new(correct: u64, total: u64) -> Self {
        Self { correct, total }
    }

    /// Fold one persisted verdict into the counters
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Percentage of correct results, 0.0 for an empty file
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }

    pub fn accuracy_label(&self) -> String {
        format!("{:.2}%", self.accuracy())
    }

    /// Serialized header object without padding
    pub fn encode_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> EvalResult<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        let line = HeaderLine {
            meta_stats: true,
            accuracy: self.accuracy_label(),
            correct: self.correct,
            total: self.total,
            updated_at: now.format(TIMESTAMP_FORMAT).to_string(),
        };
        Ok(serde_json::to_string(&line)?)
    }

    /// Padded header line stamped with the current local time
    pub fn render(&self, width: usize) -> EvalResult<String> {
        self.render_at(width, &Local::now())
    }

    /// Header padded with spaces to `width` bytes, plus a newline.
    /// Refuses to truncate.
    pub fn render_at<Tz: TimeZone>(&self, width: usize, now: &DateTime<Tz>) -> EvalResult<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut line = self.encode_at(now)?;
        if line.len() > width {
            return Err(EvalError::storage(format!(
                "Header of {} bytes does not fit in {} bytes",
                line.len(),
                width
            )));
        }
        line.extend(std::iter::repeat_n(' ', width - line.len()));
        line.push('\n');
        Ok(line)
    }

    /// Largest header any counter values can produce
    pub fn max_encoded_len() -> usize {
        let worst = StatsHeader::new(u64::MAX, u64::MAX);
        worst
            .encode_at(&Local::now())
            .map(|line| line.len())
            .unwrap_or(usize::MAX)
    }

    /// Fail fast when `width` cannot hold every possible header
    pub fn check_width(width: usize) -> EvalResult<()> {
        let needed = Self::max_encoded_len();
        if needed > width {
            return Err(EvalError::config_with_context(
                format!("Header width {} is smaller than {} bytes", width, needed),
                "result store",
            ));
        }
        Ok(())
    }
}

/// Whether a parsed JSON line is a statistics header
pub fn is_header_object(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("_meta_stats"))
}
