//! Error types for mojicheck.
//!
//! Provides [`DefectError`] for fatal errors that stop scanning a document.
//! A document without findings is not an error; see
//! [`collect_defects`](crate::collect_defects).

use thiserror::Error;

/// Fatal error types for defect scanning.
#[derive(Debug, Error)]
pub enum DefectError {
    /// Error parsing PDF structure or extracting page content.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error reading a document or writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing or parsing the JSON report.
    #[error("report error: {0}")]
    Report(#[from] serde_json::Error),

    /// A page index past the end of the document was requested.
    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// The requested 0-based page index.
        index: usize,
        /// Number of pages in the document.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = DefectError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "parse error: invalid xref table");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: DefectError = io_err.into();
        assert!(matches!(err, DefectError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn page_out_of_range_display() {
        let err = DefectError::PageOutOfRange { index: 5, count: 3 };
        assert_eq!(
            err.to_string(),
            "page 5 out of range (document has 3 pages)"
        );
    }

    #[test]
    fn report_error_from_serde() {
        let serde_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: DefectError = serde_err.into();
        assert!(matches!(err, DefectError::Report(_)));
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(DefectError::Parse("trailer missing".to_string()));
        assert_eq!(err.to_string(), "parse error: trailer missing");
    }
}
