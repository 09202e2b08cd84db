//! Document resolution

use crate::dataset::QuestionRecord;
use std::path::PathBuf;

/// Resolves one source document to its text; `None` means the document is
/// absent, which is not an error.
pub trait DocumentSource: Send + Sync {
    fn load(&self, category: &str, set_id: &str, filename: &str) -> Option<String>;
}

/// Documents stored as `<root>/<category>/<set id>/<filename>`
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for FsDocumentSource {
    fn load(&self, category: &str, set_id: &str, filename: &str) -> Option<String> {
        let path = self.root.join(category).join(set_id).join(filename);
        match std::fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "document not available");
                None
            }
        }
    }
}

/// Resolve every source document of a question, omitting absent ones
pub fn load_document_set(source: &dyn DocumentSource, question: &QuestionRecord) -> Vec<String> {
    question
        .source_filenames
        .iter()
        .filter_map(|filename| {
            source.load(
                &question.document_category,
                &question.document_set_id,
                filename,
            )
        })
        .collect()
}
