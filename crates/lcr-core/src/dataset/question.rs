//! Question records and CSV loading

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One benchmark question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Stable identifier, integer-like
    pub id: String,
    pub question: String,
    /// Reference answer the judge compares against
    pub gold_answer: String,
    pub document_category: String,
    pub document_set_id: String,
    /// Source documents in prompt order
    pub source_filenames: Vec<String>,
}

impl QuestionRecord {
    /// Integer value of the id used for ordering; unparseable ids sort as 0
    pub fn sort_key(&self) -> i64 {
        self.id.trim().parse().unwrap_or(0)
    }
}

#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(default)]
    question_id: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    document_category: Option<String>,
    #[serde(default)]
    document_set_id: Option<String>,
    #[serde(default)]
    data_source_filenames: Option<String>,
}

impl From<CsvRow> for QuestionRecord {
    fn from(row: CsvRow) -> Self {
        let trimmed = |value: Option<String>| value.unwrap_or_default().trim().to_string();
        let source_filenames = row
            .data_source_filenames
            .map(|names| {
                names
                    .split(';')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: trimmed(row.question_id),
            question: trimmed(row.question),
            gold_answer: trimmed(row.answer),
            document_category: trimmed(row.document_category),
            document_set_id: trimmed(row.document_set_id),
            source_filenames,
        }
    }
}

/// Load all questions from a CSV file, sorted by integer id
pub fn load_questions(path: &Path) -> EvalResult<Vec<QuestionRecord>> {
    let file = std::fs::File::open(path).map_err(|e| {
        EvalError::io_with_path(
            format!("Failed to open dataset: {}", e),
            path.display().to_string(),
        )
    })?;
    read_questions(file)
}

/// Read questions from any CSV source.
///
/// Missing columns become empty strings and rows that cannot be decoded are
/// skipped with a warning.
pub fn read_questions(reader: impl Read) -> EvalResult<Vec<QuestionRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut questions = Vec::new();
    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => questions.push(QuestionRecord::from(row)),
            Err(e) => tracing::warn!(row = index + 1, error = %e, "skipping malformed dataset row"),
        }
    }

    questions.sort_by_key(QuestionRecord::sort_key);
    Ok(questions)
}
