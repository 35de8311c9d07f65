use std::fs;
use std::path::{Path, PathBuf};

use mojicheck::mojicheck_core::RectAnnotation;
use mojicheck::mojicheck_core::report::ARTIFACT_SUFFIX;
use mojicheck::{RuleSet, ScanOutcome, scan_file};
use tracing::debug;

/// Check `path`: a single PDF file, or every PDF file directly inside a
/// directory. A file without the `.pdf` extension is reported and skipped.
///
/// Returns `Err(1)` after printing to stderr when the path does not exist or
/// a document fails; in directory mode the first failure stops the batch.
pub fn run(path: &Path) -> Result<(), i32> {
    let rules = RuleSet::default();

    if path.is_dir() {
        let files = pdf_files_in(path)?;
        debug!(dir = %path.display(), files = files.len(), "scanning directory");
        for file in &files {
            check_file(file, &rules)?;
        }
        return Ok(());
    }

    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(1);
    }
    if !has_pdf_extension(path) {
        eprintln!("invalid path {}", path.display());
        return Ok(());
    }
    check_file(path, &rules)
}

fn check_file(path: &Path, rules: &RuleSet) -> Result<(), i32> {
    println!("チェック中: {}", path.display());

    let outcome = scan_file(path, rules).map_err(|e| {
        eprintln!("Error: {}: {e}", path.display());
        1
    })?;

    match outcome {
        ScanOutcome::Clean => {
            println!("問題は見つかりませんでした: {}", path.display());
        }
        ScanOutcome::Reported { paths, records } => {
            for record in &records {
                let note = RectAnnotation::for_record(record).note;
                println!("{} {note}", record.display_label);
            }
            println!("出力: {}", paths.report.display());
            println!("出力: {}", paths.annotated.display());
        }
    }
    Ok(())
}

/// Regular files directly inside `dir` whose extension is exactly `pdf`,
/// sorted by path. Annotated documents written by an earlier run are left
/// out.
fn pdf_files_in(dir: &Path) -> Result<Vec<PathBuf>, i32> {
    let entries = fs::read_dir(dir).map_err(|e| {
        eprintln!("Error: cannot read directory {}: {e}", dir.display());
        1
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .filter(|p| {
            let earlier_output = is_artifact(p);
            if earlier_output {
                debug!(path = %p.display(), "skipping annotated output");
            }
            !earlier_output
        })
        .collect();
    files.sort();
    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "pdf")
}

fn is_artifact(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(ARTIFACT_SUFFIX))
}
