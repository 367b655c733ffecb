//! PDF text extraction for uploaded résumés and job descriptions.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("file is empty")]
    Empty,

    #[error("could not extract text: {0}")]
    Extraction(String),

    #[error("PDF parser aborted on malformed input")]
    Malformed,
}

/// Extracts the text of every page and collapses all whitespace runs to single spaces.
///
/// Blocking and CPU-bound; call from `spawn_blocking` inside async handlers.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, PdfError> {
    if bytes.is_empty() {
        return Err(PdfError::Empty);
    }

    // pdf-extract can panic on malformed streams instead of returning an error.
    let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| PdfError::Malformed)?
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    Ok(collapse_whitespace(&text))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
