//! Two-region file: a fixed-size header at offset zero followed by an
//! append-only log.

use crate::error::{EvalError, EvalResult};
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Single-writer handle over a headered log file.
///
/// Callers never deal with offsets: [`patch_header`](Self::patch_header)
/// rewrites bytes `0..header_len` and [`append_line`](Self::append_line)
/// writes at the tracked log cursor. Both flush before returning.
#[derive(Debug)]
pub struct HeaderedLog {
    path: PathBuf,
    file: File,
    header_len: usize,
    cursor: u64,
}

impl HeaderedLog {
    /// Replace the file at `path` with `header` followed by `lines`.
    ///
    /// The new content is written to a sibling temp file and renamed over
    /// the target, so a crash leaves either the old or the new file.
    pub fn rewrite<S: AsRef<str>>(path: &Path, header: &str, lines: &[S]) -> EvalResult<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| {
            EvalError::io_with_path(
                format!("Failed to create directory: {}", e),
                dir.display().to_string(),
            )
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
            EvalError::io_with_path(
                format!("Failed to create temp file: {}", e),
                dir.display().to_string(),
            )
        })?;
        temp.write_all(header.as_bytes())?;
        for line in lines {
            temp.write_all(line.as_ref().as_bytes())?;
            temp.write_all(b"\n")?;
        }
        temp.flush()?;
        if let Ok(existing) = std::fs::metadata(path) {
            temp.as_file().set_permissions(existing.permissions())?;
        }
        temp.persist(path).map_err(|e| {
            EvalError::io_with_path(
                format!("Failed to replace result file: {}", e.error),
                path.display().to_string(),
            )
        })?;

        tracing::debug!(path = %path.display(), lines = lines.len(), "result file rewritten");
        Self::open(path, header.len())
    }

    /// Open an existing headered file whose header occupies `header_len`
    /// bytes including its newline.
    pub fn open(path: &Path, header_len: usize) -> EvalResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                EvalError::io_with_path(
                    format!("Failed to open result file: {}", e),
                    path.display().to_string(),
                )
            })?;
        let cursor = file.seek(SeekFrom::End(0))?;
        if cursor < header_len as u64 {
            return Err(EvalError::storage(format!(
                "{} is shorter than its {} byte header",
                path.display(),
                header_len
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            file,
            header_len,
            cursor,
        })
    }

    /// Overwrite the header in place. The new header must have exactly the
    /// length of the old one.
    pub fn patch_header(&mut self, header: &str) -> EvalResult<()> {
        if header.len() != self.header_len {
            return Err(EvalError::storage(format!(
                "Header of {} bytes cannot replace a {} byte header",
                header.len(),
                self.header_len
            )));
        }
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(header.as_bytes())?;
        self.file.seek(SeekFrom::Start(self.cursor))?;
        self.file.flush()?;
        Ok(())
    }

    /// Append one line (a newline is added) at the end of the log region
    pub fn append_line(&mut self, line: &str) -> EvalResult<()> {
        self.file.seek(SeekFrom::Start(self.cursor))?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        self.cursor += line.len() as u64 + 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset where the next line will be written
    pub fn cursor(&self) -> u64 {
        self.cursor
    }
}
