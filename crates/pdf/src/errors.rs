use std::path::PathBuf;
use thiserror::Error;

/// The policy document could not be loaded. Nothing downstream can render without it.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Policy document not found at '{}'", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read policy document '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal extraction failure. The affected feature degrades; the page still renders.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Table extraction failed: {0}")]
    TableExtractionFailed(String),
    #[error("Text extraction failed after {pages_read} page(s): {reason}")]
    TextExtractionFailed { pages_read: u32, reason: String },
}

/// Failure while walking the pages of a PDF.
#[derive(Error, Debug)]
pub(crate) enum LayoutError {
    #[error("Failed to open PDF: {0}")]
    Open(String),
    #[error("Failed to read page {page} of {page_count}: {reason}")]
    Page {
        page: u32,
        page_count: u32,
        reason: String,
    },
}
