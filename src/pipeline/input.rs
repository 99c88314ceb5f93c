//! Input discovery: walk the input tree and map each PDF to its output name.
//!
//! Only regular files whose name ends in exactly `.pdf` are picked up;
//! `report.PDF` and `notes.txt` are ignored. The walk is recursive and the
//! result is sorted so a batch always processes documents in the same order
//! (the order decides which of two same-named documents wins under
//! [`crate::config::OverwritePolicy::Skip`]).

use crate::config::OutputLayout;
use crate::error::ScrubError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PDF_SUFFIX: &str = ".pdf";
const TXT_SUFFIX: &str = ".txt";

/// Recursively collect every `.pdf` file under `root`, sorted by path.
pub fn discover_pdfs(root: &Path) -> Result<Vec<PathBuf>, ScrubError> {
    if !root.is_dir() {
        return Err(ScrubError::InputNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    walk(root, &mut found)?;
    found.sort();

    debug!("Discovered {} PDF(s) under {}", found.len(), root.display());
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), ScrubError> {
    let read_err = |source| ScrubError::ReadDirFailed {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(read_err)?;
        let path = entry.path();

        if file_type.is_dir() {
            walk(&path, found)?;
        } else if file_type.is_file() && is_pdf_name(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// True when the file name ends in exactly `.pdf`.
pub fn is_pdf_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(PDF_SUFFIX))
}

/// Output file name for a PDF: the trailing `.pdf` replaced by `.txt`.
///
/// `a.pdf.pdf` becomes `a.pdf.txt`; a name without the suffix just gets
/// `.txt` appended.
pub fn output_name(pdf: &Path) -> String {
    let name = pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(PDF_SUFFIX) {
        Some(stem) => format!("{stem}{TXT_SUFFIX}"),
        None => format!("{name}{TXT_SUFFIX}"),
    }
}

/// Where a PDF's text goes inside the job directory.
///
/// * `Flatten` — `job_dir/<name>.txt`, regardless of subdirectory
/// * `Mirror`  — `job_dir/<relative dirs>/<name>.txt`
pub fn output_path(input_root: &Path, pdf: &Path, job_dir: &Path, layout: OutputLayout) -> PathBuf {
    let name = output_name(pdf);
    match layout {
        OutputLayout::Flatten => job_dir.join(name),
        OutputLayout::Mirror => {
            let relative_dir = pdf
                .strip_prefix(input_root)
                .ok()
                .and_then(Path::parent)
                .unwrap_or_else(|| Path::new(""));
            job_dir.join(relative_dir).join(name)
        }
    }
}
