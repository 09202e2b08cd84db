//! Resumable result store

use super::file::HeaderedLog;
use super::header::{StatsHeader, is_header_object};
use super::record::ResultRecord;
use crate::dataset::QuestionRecord;
use crate::error::{EvalError, EvalResult};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// What a resume scan found in an existing result file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Question ids already graded
    pub done_ids: HashSet<String>,
    pub stats: StatsHeader,
    /// Valid data lines, trimmed, in file order
    pub lines: Vec<String>,
    /// Lines that were neither a header nor a result
    pub corrupt_lines: usize,
    pub had_header: bool,
}

impl ScanReport {
    /// Fold one line into the report; a line that is neither a header nor a
    /// result is a [`EvalError::CorruptLine`]
    fn fold_line(&mut self, line: &str, line_number: usize) -> EvalResult<()> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| EvalError::corrupt_line(line_number, e.to_string()))?;
        if is_header_object(&value) {
            self.had_header = true;
            return Ok(());
        }
        let question_id = match value.get("question_id") {
            Some(Value::String(id)) => id.trim().to_string(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(EvalError::corrupt_line(line_number, "missing question_id"));
            }
        };
        let correct = value.get("judge_result").and_then(Value::as_str) == Some("CORRECT");

        self.stats.record(correct);
        self.done_ids.insert(question_id);
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Append-only JSONL result file with a live statistics header.
///
/// Owns the file handle and the counters exclusively. Every write goes
/// through [`append`](Self::append), which appends the record and then
/// patches the header in place.
#[derive(Debug)]
pub struct ResultStore {
    log: HeaderedLog,
    header_width: usize,
    stats: StatsHeader,
    done_ids: HashSet<String>,
}

impl ResultStore {
    /// Scan `path` if it exists, then rewrite it as a fresh header followed
    /// by every valid line found.
    pub fn open(path: impl AsRef<Path>, header_width: usize) -> EvalResult<Self> {
        let path = path.as_ref();
        StatsHeader::check_width(header_width)?;

        let report = Self::scan(path)?;
        let header = report.stats.render(header_width)?;
        let log = HeaderedLog::rewrite(path, &header, &report.lines)?;

        debug!(
            path = %path.display(),
            done = report.done_ids.len(),
            corrupt = report.corrupt_lines,
            repaired_header = !report.had_header,
            "opened result store"
        );

        Ok(Self {
            log,
            header_width,
            stats: report.stats,
            done_ids: report.done_ids,
        })
    }

    /// Read-only resume scan. A missing file yields an empty report.
    pub fn scan(path: impl AsRef<Path>) -> EvalResult<ScanReport> {
        let path = path.as_ref();
        let mut report = ScanReport::default();
        if !path.exists() {
            return Ok(report);
        }

        let bytes = std::fs::read(path).map_err(|e| {
            EvalError::io_with_path(
                format!("Failed to read result file: {}", e),
                path.display().to_string(),
            )
        })?;
        let content = String::from_utf8_lossy(&bytes);

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Err(e) = report.fold_line(line, index + 1) {
                warn!(path = %path.display(), error = %e, "skipping line during resume scan");
                report.corrupt_lines += 1;
            }
        }
        Ok(report)
    }

    pub fn done_ids(&self) -> &HashSet<String> {
        &self.done_ids
    }

    pub fn is_done(&self, question_id: &str) -> bool {
        self.done_ids.contains(question_id.trim())
    }

    /// Questions not yet graded, in the given order
    pub fn pending(&self, questions: &[QuestionRecord]) -> Vec<QuestionRecord> {
        questions
            .iter()
            .filter(|question| !self.is_done(&question.id))
            .cloned()
            .collect()
    }

    /// Persist one terminal record and refresh the header.
    ///
    /// `ERROR` records are not written and leave the counters untouched;
    /// returns whether the record was persisted.
    pub fn append(&mut self, record: &ResultRecord) -> EvalResult<bool> {
        if record.is_error() {
            return Ok(false);
        }

        let line = serde_json::to_string(record)?;
        let mut stats = self.stats;
        stats.record(record.judge_result.is_correct());
        let header = stats.render(self.header_width)?;

        self.log.append_line(&line)?;
        self.log.patch_header(&header)?;
        self.stats = stats;
        self.done_ids.insert(record.question_id.trim().to_string());
        Ok(true)
    }

    pub fn stats(&self) -> StatsHeader {
        self.stats
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::JudgeVerdict;
    use crate::llm::TokenUsage;
    use crate::store::HEADER_WIDTH;
    use tempfile::TempDir;

    fn question(id: &str) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            question: format!("question {id}"),
            gold_answer: "gold".to_string(),
            ..Default::default()
        }
    }

    fn graded(id: &str, verdict: JudgeVerdict) -> ResultRecord {
        ResultRecord::completed(&question(id), "answer", verdict, TokenUsage::new(10, 2))
    }

    fn header_of(path: &Path) -> Value {
        let content = std::fs::read_to_string(path).unwrap();
        let first = content.lines().next().unwrap();
        assert_eq!(first.len(), HEADER_WIDTH);
        serde_json::from_str(first.trim_end()).unwrap()
    }

    #[test]
    fn test_open_creates_header_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");

        let store = ResultStore::open(&path, HEADER_WIDTH).unwrap();
        assert_eq!(store.stats(), StatsHeader::default());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), HEADER_WIDTH as u64 + 1);
        assert_eq!(header_of(&path)["accuracy"], "0.00%");
    }

    #[test]
    fn test_append_updates_header_and_skips_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");
        let mut store = ResultStore::open(&path, HEADER_WIDTH).unwrap();

        assert!(store.append(&graded("1", JudgeVerdict::Correct)).unwrap());
        assert!(store.append(&graded("2", JudgeVerdict::Incorrect)).unwrap());
        assert!(store.append(&ResultRecord::skipped(&question("3"), "too long")).unwrap());
        let failed = ResultRecord::failed(&question("4"), &EvalError::terminal_call(3, "down"));
        assert!(!store.append(&failed).unwrap());

        let header = header_of(&path);
        assert_eq!(header["correct"], 1);
        assert_eq!(header["total"], 3);
        assert_eq!(header["accuracy"], "33.33%");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(!content.contains("\"ERROR\""));
        assert!(store.is_done("3"));
        assert!(!store.is_done("4"));
    }

    #[test]
    fn test_header_patch_never_moves_data_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");
        let mut store = ResultStore::open(&path, HEADER_WIDTH).unwrap();

        store.append(&graded("1", JudgeVerdict::Correct)).unwrap();
        let before = std::fs::read(&path).unwrap();
        for id in 2..40 {
            store
                .append(&graded(&id.to_string(), JudgeVerdict::Correct))
                .unwrap();
        }
        let after = std::fs::read(&path).unwrap();

        assert_eq!(after[HEADER_WIDTH], b'\n');
        assert_eq!(&after[HEADER_WIDTH + 1..before.len()], &before[HEADER_WIDTH + 1..]);
    }

    #[test]
    fn test_reopen_resumes_counters_and_repairs_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");
        let good_1 = serde_json::to_string(&graded("1", JudgeVerdict::Correct)).unwrap();
        let good_3 = serde_json::to_string(&graded("3", JudgeVerdict::Unknown)).unwrap();
        std::fs::write(
            &path,
            format!(
                "{{\"_meta_stats\": true, \"total\": 99}}\n{good_1}\nnot json\n\n{{\"no_id\":1}}\n{good_3}\n"
            ),
        )
        .unwrap();

        let store = ResultStore::open(&path, HEADER_WIDTH).unwrap();
        assert_eq!(store.stats(), StatsHeader::new(1, 2));
        assert!(store.is_done("1"));
        assert!(store.is_done("3"));

        let pending: Vec<String> = store
            .pending(&[question("1"), question("2"), question("3"), question("4")])
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(pending, vec!["2", "4"]);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], good_1);
        assert_eq!(lines[2], good_3);
        assert_eq!(header_of(&path)["total"], 2);
    }

    #[test]
    fn test_scan_of_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let report = ResultStore::scan(dir.path().join("absent.jsonl")).unwrap();
        assert!(report.done_ids.is_empty());
        assert_eq!(report.stats.total, 0);
    }

    #[test]
    fn test_numeric_ids_are_recognized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");
        std::fs::write(&path, "{\"question_id\": 12, \"judge_result\": \"CORRECT\"}\n").unwrap();

        let report = ResultStore::scan(&path).unwrap();
        assert!(report.done_ids.contains("12"));
        assert_eq!(report.stats, StatsHeader::new(1, 1));
        assert!(!report.had_header);
    }

    #[test]
    fn test_narrow_header_width_fails_at_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.jsonl");
        let err = ResultStore::open(&path, 64).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
        assert!(!path.exists());
    }
}
