//! The text sanitization pipeline.
//!
//! Three stages, always in this order:
//!
//! ```text
//! raw text ──▶ code blocks ──▶ whitespace ──▶ redaction ──▶ sanitized
//!              (line-based)    (\s{2,} → " ")  (URLs, hxxp, wp-content, .com/)
//! ```
//!
//! Code removal must run first because it relies on line boundaries and
//! indentation, both of which whitespace normalization destroys. Redaction
//! runs on the normalized text, where every indicator is delimited by a
//! single space.

use crate::config::SignatureMatching;
use crate::output::SanitizedText;
use crate::pipeline::code_blocks::CodeBlockRemover;
use crate::pipeline::redact::redact_indicators_with_report;
use crate::pipeline::whitespace::normalize_whitespace;

/// Runs the sanitization stages with a fixed signature catalogue.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    code: CodeBlockRemover,
}

impl Sanitizer {
    pub fn new(matching: SignatureMatching) -> Self {
        Self {
            code: CodeBlockRemover::new(matching),
        }
    }

    /// Sanitize `text`, discarding the per-stage statistics.
    pub fn sanitize(&self, text: &str) -> String {
        self.sanitize_with_report(text).text
    }

    /// Sanitize `text` and report what each stage removed.
    pub fn sanitize_with_report(&self, text: &str) -> SanitizedText {
        let (without_code, code) = self.code.remove_with_stats(text);
        let normalized = normalize_whitespace(&without_code);
        let (text, redactions) = redact_indicators_with_report(&normalized);
        SanitizedText {
            text,
            code,
            redactions,
        }
    }
}

/// Sanitize with the default (case-sensitive) catalogue.
pub fn sanitize_text(text: &str) -> String {
    Sanitizer::default().sanitize(text)
}
