//! Diagnostic sinks: where document- and page-level failures are reported.
//!
//! Pass a [`DiagnosticSink`] to [`crate::job::run_job`] to receive events as
//! the batch walks its documents. Failures reported here are informational;
//! the batch keeps going. The library ships three sinks:
//!
//! * [`TracingSink`] — reports through `tracing` (the "log" sink, default)
//! * [`ConsoleSink`] — prints plain lines to stderr
//! * [`NoopSink`]    — discards everything
//!
//! # Example
//!
//! ```rust
//! use pdfscrub::{DiagnosticSink, ExtractError};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct CountFailures(AtomicUsize);
//!
//! impl DiagnosticSink for CountFailures {
//!     fn on_document_failed(&self, _error: &ExtractError) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//! ```

use crate::error::{ExtractError, PageError};
use crate::output::JobReport;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Receives job events. All methods default to no-ops.
pub trait DiagnosticSink: Send + Sync {
    /// Called once after the input tree has been scanned.
    fn on_job_start(&self, job_id: &str, total_documents: usize) {
        let _ = (job_id, total_documents);
    }

    /// Called before a document is opened.
    ///
    /// * `index` — 1-indexed position in the batch
    fn on_document_start(&self, path: &Path, index: usize, total: usize) {
        let _ = (path, index, total);
    }

    /// Called when a page failed both extraction modes.
    fn on_page_failed(&self, path: &Path, error: &PageError) {
        let _ = (path, error);
    }

    /// Called when a whole document is skipped because it could not be read.
    fn on_document_failed(&self, error: &ExtractError) {
        let _ = error;
    }

    /// Called when a document's output name is already taken and the
    /// overwrite policy is `Skip`.
    fn on_document_skipped(&self, path: &Path, output: &Path, reason: &str) {
        let _ = (path, output, reason);
    }

    /// Called after a document's sanitized text has been written.
    fn on_document_written(&self, path: &Path, output: &Path, chars: usize) {
        let _ = (path, output, chars);
    }

    /// Called once after every document has been attempted.
    fn on_job_complete(&self, report: &JobReport) {
        let _ = report;
    }
}

/// Discards every event.
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}

/// Reports failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn on_page_failed(&self, path: &Path, error: &PageError) {
        warn!(path = %path.display(), "{error}");
    }

    fn on_document_failed(&self, error: &ExtractError) {
        error!("{error}");
    }

    fn on_document_skipped(&self, path: &Path, output: &Path, reason: &str) {
        warn!(path = %path.display(), output = %output.display(), "skipped: {reason}");
    }

    fn on_job_complete(&self, report: &JobReport) {
        info!(
            job_id = %report.job_id,
            written = report.written.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "job finished"
        );
    }
}

/// Prints failures to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn on_page_failed(&self, path: &Path, error: &PageError) {
        eprintln!("{error} in {}", path.display());
    }

    fn on_document_failed(&self, error: &ExtractError) {
        eprintln!("{error}");
    }

    fn on_document_skipped(&self, path: &Path, output: &Path, reason: &str) {
        eprintln!(
            "skipping {} (output {}): {reason}",
            path.display(),
            output.display()
        );
    }
}

/// Convenience alias for a shared sink.
pub type SharedSink = Arc<dyn DiagnosticSink>;
