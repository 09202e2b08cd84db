//! Question records and the documents they refer to

mod documents;
mod question;

pub use documents::{DocumentSource, FsDocumentSource, load_document_set};
pub use question::{QuestionRecord, load_questions, read_questions};
