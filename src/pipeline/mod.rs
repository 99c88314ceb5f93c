//! Pipeline stages for PDF-to-sanitized-text conversion.
//!
//! Each submodule implements exactly one step, so every stage can be tested
//! on its own and the PDF library stays behind one seam.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ code_blocks ──▶ whitespace ──▶ redact
//! (walk)    (pdfium)    (line FSM)      (\s{2,})       (URLs, IOCs)
//! ```
//!
//! 1. [`input`]       — find `*.pdf` files and map them to output paths
//! 2. [`extract`]     — page text with layout → plain fallback; page and
//!    document failures are contained here
//! 3. [`pdfium`]      — the pdfium-render backend behind [`extract::PdfBackend`]
//! 4. [`code_blocks`] — drop regions that look like source code or hex dumps
//! 5. [`whitespace`]  — collapse whitespace runs to one space
//! 6. [`redact`]      — remove URLs and indicator paths
//!
//! Stages 4-6 are composed by [`crate::sanitize::Sanitizer`].

pub mod code_blocks;
pub mod extract;
pub mod input;
pub mod pdfium;
pub mod redact;
pub mod whitespace;
