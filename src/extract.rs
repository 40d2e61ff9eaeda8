//! PDF text extraction behind a narrow capability trait.
//!
//! Ingestion depends on [`TextExtractor`] rather than on the `pdf-extract`
//! crate directly, so the pipeline can be driven by a deterministic fake in
//! tests. The production implementation returns the concatenated plain text
//! of all pages.

/// Extraction error. Extraction never panics; a failing file is reported
/// with a human-readable message and the ingest loop skips it.
#[derive(Debug)]
pub enum ExtractError {
    Pdf(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Capability interface for turning one PDF byte buffer into plain text.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Production extractor backed by the `pdf-extract` crate.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        let err = PdfExtractor.extract(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn error_message_is_human_readable() {
        let err = PdfExtractor.extract(b"").unwrap_err();
        assert!(err.to_string().starts_with("PDF extraction failed:"));
    }
}
