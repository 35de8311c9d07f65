//! Scanning one PDF file end to end.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use mojicheck_core::{
    AnnotationPlan, DefectError, DefectRecord, OutputPaths, RuleSet, collect_defects,
    write_report,
};
use tracing::{debug, info, warn};

use crate::annotate::{render_plan, save_document};
use crate::document::SourceDocument;

/// Result of scanning one document.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// No defects; nothing was written.
    Clean,
    /// Defects were found and both artifacts written.
    Reported {
        paths: OutputPaths,
        records: Vec<DefectRecord>,
    },
}

impl ScanOutcome {
    pub fn records(&self) -> &[DefectRecord] {
        match self {
            ScanOutcome::Clean => &[],
            ScanOutcome::Reported { records, .. } => records,
        }
    }
}

/// Scan the PDF at `path` with `rules`.
///
/// When defects are found, `<stem>_problems.json` and `<stem>_problems.pdf`
/// are written next to the input. The annotated document is built before
/// anything is written; if saving it fails the report is removed again, so
/// the artifacts are either both present or both absent.
///
/// # Errors
///
/// Returns [`DefectError`] if the document cannot be opened or parsed, or if
/// an artifact cannot be written.
pub fn scan_file(path: &Path, rules: &RuleSet) -> Result<ScanOutcome, DefectError> {
    debug!(path = %path.display(), rules = ?rules.rule_names(), "scanning");
    let doc = SourceDocument::open(path)?;
    let records = collect_defects(&doc, rules)?;
    if records.is_empty() {
        debug!(path = %path.display(), "no defects");
        return Ok(ScanOutcome::Clean);
    }

    let plan = AnnotationPlan::from_records(&records);
    let annotated = render_plan(doc.raw(), doc.page_ids(), &plan)?;
    drop(doc);

    let paths = OutputPaths::for_input(path);
    write_report_file(&paths.report, &records).inspect_err(|_| discard(&paths.report))?;
    info!(path = %paths.report.display(), records = records.len(), "wrote report");

    if let Err(err) = save_document(annotated, &paths.annotated) {
        discard(&paths.report);
        discard(&paths.annotated);
        return Err(err.into());
    }
    info!(
        path = %paths.annotated.display(),
        pages = plan.pages.len(),
        annotations = plan.annotation_count(),
        "wrote annotated document"
    );

    Ok(ScanOutcome::Reported { paths, records })
}

fn write_report_file(path: &Path, records: &[DefectRecord]) -> Result<(), DefectError> {
    let file = File::create(path)?;
    write_report(BufWriter::new(file), records)
}

/// Remove a partially written artifact.
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
    }
}
