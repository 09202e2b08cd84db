//! Task prompt assembly

/// Wrap every document in numbered markers and ask the question after them
pub fn build_task_prompt<S: AsRef<str>>(documents: &[S], question: &str) -> String {
    let documents_text = documents
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let n = index + 1;
            format!("BEGIN DOCUMENT {n}:\n{}\nEND DOCUMENT {n}", text.as_ref())
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "BEGIN INPUT DOCUMENTS\n\n{documents_text}\n\nEND INPUT DOCUMENTS\n\n\
         Answer the following question using the input documents provided above.\n\n\
         START QUESTION\n\n{question}\n\nEND QUESTION\n"
    )
}
