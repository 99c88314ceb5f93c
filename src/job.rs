//! Batch job runner: every PDF under the input root becomes one sanitized
//! text file under `<output_root>/<job_id>/`.
//!
//! ## Failure scopes
//!
//! A job either returns `Ok(JobReport)` (possibly with failed or skipped
//! documents listed in it) or stops with a fatal [`ScrubError`]:
//!
//! * the job directory already exists → nothing is written at all
//! * an output name is taken under [`OverwritePolicy::Error`] → the batch
//!   stops; files written before the collision stay on disk
//! * a document cannot be read → reported, no output file, batch continues
//!
//! Output files are written atomically (temp file in the same directory,
//! then rename), so a crash never leaves a half-written `.txt` behind.

use crate::config::{JobConfig, OverwritePolicy};
use crate::diagnostics::DiagnosticSink;
use crate::error::ScrubError;
use crate::output::{DocumentRecord, JobReport, SkippedDocument};
use crate::pipeline::extract::{extract_document, PdfBackend};
use crate::pipeline::input::{discover_pdfs, output_path};
use crate::sanitize::Sanitizer;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// A fresh random job id (UUID v4, hyphenated).
pub fn new_job_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Run one batch job.
///
/// # Errors
/// Returns `Err(ScrubError)` only for fatal errors:
/// - invalid job id, or `<output_root>/<job_id>` already exists
/// - input root missing or unreadable
/// - output collision under [`OverwritePolicy::Error`]
/// - output directory or file cannot be written
pub fn run_job(
    job_id: &str,
    config: &JobConfig,
    backend: &dyn PdfBackend,
    sink: &dyn DiagnosticSink,
) -> Result<JobReport, ScrubError> {
    let start = Instant::now();
    validate_job_id(job_id)?;

    // ── Step 1: Claim the job directory ──────────────────────────────────
    let job_dir = config.job_dir(job_id);
    if job_dir.exists() {
        return Err(ScrubError::JobDirectoryExists { path: job_dir });
    }

    // ── Step 2: Discover inputs ──────────────────────────────────────────
    let pdfs = discover_pdfs(&config.input_root)?;
    info!(
        "Starting job {}: {} PDF(s) from {} into {}",
        job_id,
        pdfs.len(),
        config.input_root.display(),
        job_dir.display()
    );

    fs::create_dir_all(&job_dir).map_err(|source| ScrubError::CreateDirFailed {
        path: job_dir.clone(),
        source,
    })?;
    sink.on_job_start(job_id, pdfs.len());

    // ── Step 3: Extract, sanitize, write ─────────────────────────────────
    let sanitizer = Sanitizer::new(config.signatures);
    let mut report = JobReport {
        job_id: job_id.to_string(),
        output_dir: job_dir.clone(),
        written: Vec::new(),
        failed: Vec::new(),
        skipped: Vec::new(),
        duration_ms: 0,
    };

    let total = pdfs.len();
    for (i, pdf) in pdfs.iter().enumerate() {
        debug!("[{}/{}] {}", i + 1, total, pdf.display());
        sink.on_document_start(pdf, i + 1, total);

        let extracted = match extract_document(backend, pdf, sink) {
            Ok(doc) => doc,
            Err(e) => {
                sink.on_document_failed(&e);
                report.failed.push(e);
                continue;
            }
        };

        let sanitized = sanitizer.sanitize_with_report(&extracted.text);
        let target = output_path(&config.input_root, pdf, &job_dir, config.layout);

        if target.exists() {
            match config.overwrite {
                OverwritePolicy::Error => {
                    return Err(ScrubError::OutputCollision { path: target });
                }
                OverwritePolicy::Skip => {
                    let reason = "output file already exists".to_string();
                    sink.on_document_skipped(pdf, &target, &reason);
                    report.skipped.push(SkippedDocument {
                        input: pdf.clone(),
                        output: target,
                        reason,
                    });
                    continue;
                }
                OverwritePolicy::Overwrite => {
                    debug!("Overwriting {}", target.display());
                }
            }
        }

        write_atomic(&target, &sanitized.text)?;

        let chars = sanitized.text.chars().count();
        sink.on_document_written(pdf, &target, chars);
        report.written.push(DocumentRecord {
            input: pdf.clone(),
            output: target,
            pages: extracted.page_count,
            failed_pages: extracted.failed_pages.len(),
            code_lines_dropped: sanitized.code.lines_dropped,
            redactions: sanitized.redactions.total(),
            chars,
        });
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Job {} finished: {} written, {} failed, {} skipped in {}ms",
        job_id,
        report.written.len(),
        report.failed.len(),
        report.skipped.len(),
        report.duration_ms
    );
    sink.on_job_complete(&report);

    Ok(report)
}

/// A job id becomes a single directory name under the output root.
fn validate_job_id(job_id: &str) -> Result<(), ScrubError> {
    if job_id.is_empty() {
        return Err(ScrubError::InvalidConfig("job id must not be empty".into()));
    }
    if job_id == "." || job_id == ".." || job_id.contains(['/', '\\']) {
        return Err(ScrubError::InvalidConfig(format!(
            "job id '{job_id}' must be a single path component"
        )));
    }
    Ok(())
}

/// Write `contents` to `target` via a temp file in the same directory.
fn write_atomic(target: &Path, contents: &str) -> Result<(), ScrubError> {
    let write_err = |source| ScrubError::OutputWriteFailed {
        path: target.to_path_buf(),
        source,
    };

    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|source| ScrubError::CreateDirFailed {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(target).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), target.display());
    Ok(())
}
