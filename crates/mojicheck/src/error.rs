//! Error type for the PDF backend.
//!
//! [`BackendError`] wraps lopdf, extractor and I/O failures and converts into
//! [`DefectError`] so the public API has a single error type.

use mojicheck_core::DefectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from lopdf (structure, syntax, object resolution, saving).
    #[error("PDF object error: {0}")]
    Lopdf(#[from] lopdf::Error),

    /// Error from the word and image extractor.
    #[error("extraction error: {0}")]
    Extract(String),

    /// The document structure is not what the PDF format requires.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] DefectError),
}

impl From<BackendError> for DefectError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Lopdf(e) => DefectError::Parse(e.to_string()),
            BackendError::Extract(msg) => DefectError::Parse(msg),
            BackendError::Malformed(msg) => DefectError::Parse(msg),
            BackendError::Io(e) => DefectError::Io(e),
            BackendError::Core(e) => e,
        }
    }
}
