//! Document text extraction — turns an uploaded PDF into the plain resume text.
//!
//! Pages are extracted individually and joined in page order with no separator.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

/// PDF readers accept the header anywhere in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("The uploaded file is empty")]
    Empty,

    #[error("The uploaded file is not a PDF document")]
    NotPdf,

    #[error("The PDF could not be read: {0}")]
    Malformed(String),

    #[error("The PDF parser crashed while reading the document")]
    Panicked,
}

/// Splits a document into per-page plain text.
pub trait DocumentExtractor: Send + Sync {
    fn pages(&self, document: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// `pdf-extract` backed extractor.
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn pages(&self, document: &[u8]) -> Result<Vec<String>, ExtractionError> {
        check_pdf_header(document)?;

        // pdf-extract panics on some malformed inputs instead of returning an error.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(document)
        }));

        match outcome {
            Ok(Ok(pages)) => {
                debug!(pages = pages.len(), "PDF pages extracted");
                Ok(pages)
            }
            Ok(Err(e)) => Err(ExtractionError::Malformed(e.to_string())),
            Err(_) => Err(ExtractionError::Panicked),
        }
    }
}

fn check_pdf_header(document: &[u8]) -> Result<(), ExtractionError> {
    if document.is_empty() {
        return Err(ExtractionError::Empty);
    }
    let window = &document[..document.len().min(HEADER_SEARCH_WINDOW)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        Ok(())
    } else {
        Err(ExtractionError::NotPdf)
    }
}

/// Extracts the full resume text on the blocking pool.
pub async fn extract_text(
    extractor: Arc<dyn DocumentExtractor>,
    document: Bytes,
) -> Result<String, ExtractionError> {
    let pages = tokio::task::spawn_blocking(move || extractor.pages(&document))
        .await
        .map_err(|e| {
            warn!("Extraction task failed: {e}");
            ExtractionError::Panicked
        })??;

    Ok(pages.concat())
}
