//! Page extraction with fallback modes and failure isolation.
//!
//! The PDF library is reached through two small traits, [`PdfBackend`] and
//! [`PdfPages`], so the fallback and containment rules here do not depend on
//! pdfium (see [`crate::pipeline::pdfium`] for the real backend).
//!
//! ## Failure ladder
//!
//! | Failure | Effect |
//! |---------|--------|
//! | layout mode fails for a page | retry the page in plain mode |
//! | both modes fail for a page   | [`PageError`] reported, page adds no text |
//! | document cannot be parsed    | [`ExtractError::Malformed`], file skipped |
//! | anything else (I/O, panic)   | [`ExtractError::Other`], file skipped |
//!
//! Nothing in this module returns a fatal error: a bad document never aborts
//! the batch.

use crate::diagnostics::DiagnosticSink;
use crate::error::{ExtractError, PageError};
use crate::output::{ExtractedDocument, ExtractionMode, PageOutcome};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

/// Opens documents. One backend instance serves a whole batch.
pub trait PdfBackend {
    /// Open `path`. The returned handle is released when dropped.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfPages + 'a>, ExtractError>;
}

/// An open document, addressed by 0-indexed page.
pub trait PdfPages {
    fn page_count(&self) -> usize;

    /// Text with column and whitespace positions preserved.
    fn layout_text(&self, index: usize) -> Result<String, String>;

    /// Text layer as-is.
    fn plain_text(&self, index: usize) -> Result<String, String>;
}

/// Lazy, in-order sequence of page outcomes for one open document.
pub struct PageTexts<'d, P: PdfPages + ?Sized> {
    pages: &'d P,
    next: usize,
    total: usize,
}

/// Iterate the pages of an open document, extracting each on demand.
pub fn page_texts<P: PdfPages + ?Sized>(pages: &P) -> PageTexts<'_, P> {
    PageTexts {
        pages,
        next: 0,
        total: pages.page_count(),
    }
}

impl<P: PdfPages + ?Sized> Iterator for PageTexts<'_, P> {
    type Item = PageOutcome;

    fn next(&mut self) -> Option<PageOutcome> {
        if self.next >= self.total {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(extract_page(self.pages, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

/// Extract one page: layout mode first, plain mode on failure.
pub fn extract_page<P: PdfPages + ?Sized>(pages: &P, index: usize) -> PageOutcome {
    let page = index + 1;
    match pages.layout_text(index) {
        Ok(text) => PageOutcome::Extracted {
            page,
            mode: ExtractionMode::Layout,
            text,
        },
        Err(layout) => {
            debug!("Layout extraction failed on page {page}: {layout}; retrying plain");
            match pages.plain_text(index) {
                Ok(text) => PageOutcome::Extracted {
                    page,
                    mode: ExtractionMode::Plain,
                    text,
                },
                Err(plain) => PageOutcome::Failed(PageError::BothModesFailed {
                    page,
                    layout,
                    plain,
                }),
            }
        }
    }
}

/// Extract the full text of one document.
///
/// Page failures go to `sink` and the page is left out. A panic inside the
/// backend is caught and surfaces as [`ExtractError::Other`].
pub fn extract_document(
    backend: &dyn PdfBackend,
    path: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<ExtractedDocument, ExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        extract_document_inner(backend, path, sink)
    }));

    match result {
        Ok(outcome) => outcome,
        Err(payload) => Err(ExtractError::Other {
            path: path.to_path_buf(),
            detail: format!("PDF backend panicked: {}", panic_message(payload.as_ref())),
        }),
    }
}

fn extract_document_inner(
    backend: &dyn PdfBackend,
    path: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<ExtractedDocument, ExtractError> {
    let document = backend.open(path)?;

    let mut extracted = ExtractedDocument {
        path: path.to_path_buf(),
        page_count: document.page_count(),
        ..ExtractedDocument::default()
    };

    for outcome in page_texts(document.as_ref()) {
        match outcome {
            PageOutcome::Extracted { mode, text, .. } => {
                match mode {
                    ExtractionMode::Layout => extracted.layout_pages += 1,
                    ExtractionMode::Plain => extracted.plain_pages += 1,
                }
                extracted.text.push_str(&text);
            }
            PageOutcome::Failed(e) => {
                debug!("{} in {}", e, path.display());
                sink.on_page_failed(path, &e);
                extracted.failed_pages.push(e);
            }
        }
    }

    debug!(
        "Extracted {} chars from {} ({} layout / {} plain / {} failed pages)",
        extracted.text.len(),
        path.display(),
        extracted.layout_pages,
        extracted.plain_pages,
        extracted.failed_pages.len()
    );

    Ok(extracted)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
