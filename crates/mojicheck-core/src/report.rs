//! JSON report of the defects found in one document.
//!
//! The report is a UTF-8 JSON array with one object per [`DefectRecord`],
//! indented with two spaces. Non-ASCII text is written as-is, never escaped.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::DefectError;
use crate::record::DefectRecord;

/// Suffix appended to the input file stem for both artifacts.
pub const ARTIFACT_SUFFIX: &str = "_problems";

/// Serialize `records` as a pretty-printed JSON array into `writer`.
///
/// # Errors
///
/// Returns [`DefectError::Report`] if serialization or the write fails.
pub fn write_report<W: Write>(mut writer: W, records: &[DefectRecord]) -> Result<(), DefectError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Serialize `records` as a pretty-printed JSON string.
///
/// # Errors
///
/// Returns [`DefectError::Report`] if serialization fails.
pub fn report_to_string(records: &[DefectRecord]) -> Result<String, DefectError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a report previously written by [`write_report`].
///
/// # Errors
///
/// Returns [`DefectError::Report`] if the input is not a valid report.
pub fn read_report<R: Read>(reader: R) -> Result<Vec<DefectRecord>, DefectError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Paths of the two artifacts produced for one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<stem>_problems.json`
    pub report: PathBuf,
    /// `<stem>_problems.pdf`
    pub annotated: PathBuf,
}

impl OutputPaths {
    /// Artifacts live next to the input file.
    pub fn for_input(input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            report: input.with_file_name(format!("{stem}{ARTIFACT_SUFFIX}.json")),
            annotated: input.with_file_name(format!("{stem}{ARTIFACT_SUFFIX}.pdf")),
        }
    }
}
