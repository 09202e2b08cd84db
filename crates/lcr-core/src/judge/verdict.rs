use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state outcome of a grading call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JudgeVerdict {
    Correct,
    Incorrect,
    Unknown,
}

impl JudgeVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            JudgeVerdict::Correct => "CORRECT",
            JudgeVerdict::Incorrect => "INCORRECT",
            JudgeVerdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for JudgeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map free judge text to a verdict.
///
/// Case-insensitive on the trimmed text. `INCORRECT` anywhere wins over
/// `CORRECT`, so "correct, not incorrect" grades as incorrect.
pub fn normalize_judge_result(text: &str) -> JudgeVerdict {
    let upper = text.trim().to_uppercase();
    let has_incorrect = upper.contains("INCORRECT");
    if upper.contains("CORRECT") && !has_incorrect {
        JudgeVerdict::Correct
    } else if has_incorrect {
        JudgeVerdict::Incorrect
    } else {
        JudgeVerdict::Unknown
    }
}
