//! Code block removal: a line-oriented classifier that drops source listings.
//!
//! Threat-intel reports routinely embed Python droppers, C headers, Java
//! stubs, disassembly and hex dumps. None of that is prose, and it poisons a
//! language model trained on the extracted text. The classifier assumes that
//! a line *starting* with a code-like construct opens a listing, and that a
//! listing ends at the second of two consecutive blank lines.
//!
//! ## State machine
//!
//! ```text
//!            signature line
//!   NORMAL ─────────────────▶ IN_CODE ──┐ any non-separator line
//!     ▲                          │  ◀───┘ (incl. one blank line)
//!     └──────────────────────────┘
//!        second of two consecutive blank lines
//! ```
//!
//! Per line, in this order: a double-blank separator clears `in_code`; a
//! signature match sets it; the line is kept only if `in_code` is clear.
//! Hence the first separator blank is dropped with the listing and the
//! second one is kept.

use crate::config::SignatureMatching;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};

/// Source language family a signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageFamily {
    /// Python, Ruby.
    Scripting,
    /// C and C++ preprocessor / declarations.
    CFamily,
    /// Java and other JVM languages.
    Jvm,
    /// C# and the .NET runtime.
    Clr,
    /// x86 assembly mnemonics.
    Assembly,
    /// `xxd`/`hexdump` style dumps.
    HexDump,
}

/// One entry of the signature catalogue.
#[derive(Debug)]
pub struct SignaturePattern {
    /// Short human-readable name, e.g. `"python import"`.
    pub name: &'static str,
    pub family: LanguageFamily,
    regex: Regex,
}

impl SignaturePattern {
    /// Whether this signature matches the (already trimmed) line.
    pub fn matches(&self, trimmed: &str) -> bool {
        self.regex.is_match(trimmed)
    }
}

// The leading `[\d\s]*` tolerates line numbers pasted in front of listings.
// Every pattern is anchored at the start of the trimmed line.
const SIGNATURES: &[(&str, LanguageFamily, &str)] = &[
    // python
    ("python def", LanguageFamily::Scripting, r"[\d\s.]*def .+\("),
    ("python import", LanguageFamily::Scripting, r"[\d\s]*import .+"),
    ("python from-import", LanguageFamily::Scripting, r"[\d\s]*from .+ import"),
    // ruby
    ("ruby require", LanguageFamily::Scripting, r"[\d\s]*require '.+' "),
    // C
    ("c void function", LanguageFamily::CFamily, r"[\d\s]*void .+\("),
    ("c char function", LanguageFamily::CFamily, r"[\d\s]*char .+\("),
    ("c include", LanguageFamily::CFamily, r"[\d\s]*#include"),
    ("c define", LanguageFamily::CFamily, r"[\d\s]*#define"),
    ("c ifndef", LanguageFamily::CFamily, r"[\d\s]*#ifndef"),
    ("c typedef", LanguageFamily::CFamily, r"[\d\s]*typedef"),
    // java
    ("java public static", LanguageFamily::Jvm, r"[\d\s]*public static "),
    ("java private static", LanguageFamily::Jvm, r"[\d\s]*private static "),
    ("java public void", LanguageFamily::Jvm, r"[\d\s]*public void "),
    ("java private void", LanguageFamily::Jvm, r"[\d\s]*private void "),
    // C#
    ("c# namespace", LanguageFamily::Clr, r"[\d\s]*namespace "),
    // assembly
    (
        "x86 mnemonic",
        LanguageFamily::Assembly,
        r"[\d\s]*(?:push|mov|xor|mul|inc|cmp|jnz|pop|ret) ",
    ),
    // hex dump
    (
        "hex dump",
        LanguageFamily::HexDump,
        r"[\d\s]*[0-9A-Fa-f]{8} [0-9A-Fa-f]{2} [0-9A-Fa-f]{2} [0-9A-Fa-f]{2}",
    ),
];

/// The ordered, immutable catalogue of code signatures.
///
/// Two instances exist for the whole process (case-sensitive and
/// case-insensitive), built on first use and shared read-only afterwards.
#[derive(Debug)]
pub struct SignatureCatalogue {
    patterns: Vec<SignaturePattern>,
    any: RegexSet,
}

static CASE_SENSITIVE: Lazy<SignatureCatalogue> = Lazy::new(|| SignatureCatalogue::compile(false));
static CASE_INSENSITIVE: Lazy<SignatureCatalogue> = Lazy::new(|| SignatureCatalogue::compile(true));

impl SignatureCatalogue {
    fn compile(case_insensitive: bool) -> Self {
        let anchored: Vec<String> = SIGNATURES
            .iter()
            .map(|(_, _, body)| format!("^(?:{body})"))
            .collect();

        let patterns = SIGNATURES
            .iter()
            .zip(&anchored)
            .map(|(&(name, family, _), src)| SignaturePattern {
                name,
                family,
                regex: RegexBuilder::new(src)
                    .case_insensitive(case_insensitive)
                    .build()
                    .unwrap(),
            })
            .collect();

        let any = RegexSetBuilder::new(&anchored)
            .case_insensitive(case_insensitive)
            .build()
            .unwrap();

        Self { patterns, any }
    }

    /// The shared catalogue for the given matching mode.
    pub fn get(matching: SignatureMatching) -> &'static SignatureCatalogue {
        match matching {
            SignatureMatching::CaseSensitive => &*CASE_SENSITIVE,
            SignatureMatching::CaseInsensitive => &*CASE_INSENSITIVE,
        }
    }

    /// All signatures in catalogue order.
    pub fn patterns(&self) -> &[SignaturePattern] {
        &self.patterns
    }

    /// Whether the line (trimmed first) opens a code listing.
    pub fn looks_like_code(&self, line: &str) -> bool {
        self.any.is_match(line.trim())
    }

    /// The first signature matching the line, in catalogue order.
    pub fn classify(&self, line: &str) -> Option<&SignaturePattern> {
        let trimmed = line.trim();
        self.patterns.iter().find(|p| p.matches(trimmed))
    }
}

// ── Classifier state ─────────────────────────────────────────────────────

/// Per-document classifier state, threaded through [`ClassifierState::step`].
///
/// Starts in `NORMAL` with no preceding blank line. Never shared between
/// documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub in_code: bool,
    pub prev_blank: bool,
}

/// What to do with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    Keep,
    Drop,
}

impl ClassifierState {
    /// Advance the state machine by one line (without its terminator).
    pub fn step(self, line: &str, catalogue: &SignatureCatalogue) -> (Self, LineVerdict) {
        let blank = line.trim().is_empty();
        let mut in_code = self.in_code;

        if blank && self.prev_blank {
            in_code = false;
        }
        if catalogue.looks_like_code(line) {
            in_code = true;
        }

        let verdict = if in_code {
            LineVerdict::Drop
        } else {
            LineVerdict::Keep
        };
        (
            Self {
                in_code,
                prev_blank: blank,
            },
            verdict,
        )
    }
}

// ── Remover ──────────────────────────────────────────────────────────────

/// Line counts from one removal pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalStats {
    pub lines_in: usize,
    pub lines_dropped: usize,
}

/// Removes code-like regions from a document's text.
#[derive(Debug, Clone, Copy)]
pub struct CodeBlockRemover {
    catalogue: &'static SignatureCatalogue,
}

impl Default for CodeBlockRemover {
    fn default() -> Self {
        Self::new(SignatureMatching::default())
    }
}

impl CodeBlockRemover {
    pub fn new(matching: SignatureMatching) -> Self {
        Self {
            catalogue: SignatureCatalogue::get(matching),
        }
    }

    pub fn catalogue(&self) -> &'static SignatureCatalogue {
        self.catalogue
    }

    /// Drop every code-like region; kept lines retain their terminators.
    pub fn remove(&self, text: &str) -> String {
        self.remove_with_stats(text).0
    }

    /// Like [`CodeBlockRemover::remove`], also counting dropped lines.
    pub fn remove_with_stats(&self, text: &str) -> (String, RemovalStats) {
        let mut out = String::with_capacity(text.len());
        let mut state = ClassifierState::default();
        let mut stats = RemovalStats::default();

        for raw in text.split_inclusive('\n') {
            let line = raw.strip_suffix('\n').unwrap_or(raw);
            let (next, verdict) = state.step(line, self.catalogue);
            state = next;
            stats.lines_in += 1;
            match verdict {
                LineVerdict::Keep => out.push_str(raw),
                LineVerdict::Drop => stats.lines_dropped += 1,
            }
        }

        (out, stats)
    }
}

/// Remove code blocks using the default (case-sensitive) catalogue.
pub fn remove_code_blocks(text: &str) -> String {
    CodeBlockRemover::default().remove(text)
}
