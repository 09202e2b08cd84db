//! Persisted result records

use crate::dataset::QuestionRecord;
use crate::error::EvalError;
use crate::judge::JudgeVerdict;
use crate::llm::TokenUsage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of one question, as written in `judge_result`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordVerdict {
    Correct,
    Incorrect,
    Unknown,
    Skipped,
    Error,
}

impl RecordVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordVerdict::Correct => "CORRECT",
            RecordVerdict::Incorrect => "INCORRECT",
            RecordVerdict::Unknown => "UNKNOWN",
            RecordVerdict::Skipped => "SKIPPED",
            RecordVerdict::Error => "ERROR",
        }
    }

    pub fn is_error(self) -> bool {
        self == RecordVerdict::Error
    }

    pub fn is_correct(self) -> bool {
        self == RecordVerdict::Correct
    }
}

impl From<JudgeVerdict> for RecordVerdict {
    fn from(verdict: JudgeVerdict) -> Self {
        match verdict {
            JudgeVerdict::Correct => RecordVerdict::Correct,
            JudgeVerdict::Incorrect => RecordVerdict::Incorrect,
            JudgeVerdict::Unknown => RecordVerdict::Unknown,
        }
    }
}

impl fmt::Display for RecordVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outcome for one question. Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub question_id: String,
    pub question: String,
    pub gold_answer: String,
    pub llm_answer: String,
    pub judge_result: RecordVerdict,
    pub prompt_token: u64,
    pub completion_token: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    fn base(question: &QuestionRecord, judge_result: RecordVerdict) -> Self {
        Self {
            question_id: question.id.clone(),
            question: question.question.clone(),
            gold_answer: question.gold_answer.clone(),
            llm_answer: String::new(),
            judge_result,
            prompt_token: 0,
            completion_token: 0,
            skipped_reason: None,
            error: None,
        }
    }

    pub fn skipped(question: &QuestionRecord, reason: impl Into<String>) -> Self {
        Self {
            skipped_reason: Some(reason.into()),
            ..Self::base(question, RecordVerdict::Skipped)
        }
    }

    pub fn failed(question: &QuestionRecord, error: &EvalError) -> Self {
        Self {
            error: Some(error.to_record_string()),
            ..Self::base(question, RecordVerdict::Error)
        }
    }

    pub fn completed(
        question: &QuestionRecord,
        llm_answer: impl Into<String>,
        verdict: JudgeVerdict,
        usage: TokenUsage,
    ) -> Self {
        Self {
            llm_answer: llm_answer.into(),
            prompt_token: usage.prompt_tokens,
            completion_token: usage.completion_tokens,
            ..Self::base(question, verdict.into())
        }
    }

    pub fn is_error(&self) -> bool {
        self.judge_result.is_error()
    }
}
