//! Indicator redaction: ordered URL / de-fanged indicator removal.
//!
//! URLs and indicator paths confuse a language model as much as code does,
//! so every match is replaced with a single space. The catalogue order is
//! significant: each pattern runs against the text left by the previous
//! ones, so an `hxxp` URL containing `.com/` is gone before the generic
//! `.com/` rule is tested.
//!
//! Patterns are written for whitespace-normalised input, where a URL ends at
//! the next space. The scheme and path patterns consume the terminating
//! whitespace character along with the match; end of text also terminates a
//! match. `dot-com` instead consumes the *leading* space and leaves the
//! trailing one, so a run like `a.com/1 b.com/2` is removed token by token.
//!
//! ## Catalogue
//!
//! | # | Name | Matches |
//! |---|------|---------|
//! | 1 | `http-url`   | `http://`, `https://`, `http[:]//`, ... |
//! | 2 | `hxxp-url`   | `hxxp://`, `hxxps[:]//`, ... |
//! | 3 | `wp-content` | `/wp-content/...` paths |
//! | 4 | `dot-com`    | whitespace-bounded `token.com/path` |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One entry of the redaction catalogue.
#[derive(Debug)]
pub struct RedactionPattern {
    pub name: &'static str,
    regex: Regex,
}

impl RedactionPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    /// Apply this pattern once (globally) to `text`.
    ///
    /// Returns `None` when there is no match, leaving the caller's text as is.
    pub fn apply(&self, text: &str) -> Option<(String, usize)> {
        if !self.regex.is_match(text) {
            return None;
        }
        let hits = self.regex.find_iter(text).count();
        Some((self.regex.replace_all(text, " ").into_owned(), hits))
    }
}

/// The ordered redaction catalogue, compiled once.
pub static REDACTION_PATTERNS: Lazy<Vec<RedactionPattern>> = Lazy::new(|| {
    vec![
        // The bracket around the scheme colon is optional: `http[:]//`, `http[://`.
        RedactionPattern::new("http-url", r"https?\[?:\]?//\S*(?:\s|$)"),
        RedactionPattern::new("hxxp-url", r"hxxps?\[?:\]?//\S*(?:\s|$)"),
        RedactionPattern::new("wp-content", r"/wp-content/\S*(?:\s|$)"),
        // Leaves the trailing space so the next token still sees its leading boundary.
        RedactionPattern::new("dot-com", r"(?:^|\s)\S*\.com/\S*"),
    ]
});

/// Per-pattern hit counts from one redaction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionReport {
    /// `(pattern name, matches replaced)` in catalogue order; patterns with
    /// no match are omitted.
    pub hits: Vec<(String, usize)>,
}

impl RedactionReport {
    pub fn total(&self) -> usize {
        self.hits.iter().map(|(_, n)| n).sum()
    }
}

/// Apply the whole catalogue in order.
pub fn redact_indicators(text: &str) -> String {
    redact_indicators_with_report(text).0
}

/// Like [`redact_indicators`], also reporting how many spans each pattern removed.
pub fn redact_indicators_with_report(text: &str) -> (String, RedactionReport) {
    let mut current = text.to_string();
    let mut report = RedactionReport::default();

    for pattern in REDACTION_PATTERNS.iter() {
        if let Some((next, hits)) = pattern.apply(&current) {
            report.hits.push((pattern.name.to_string(), hits));
            current = next;
        }
    }

    (current, report)
}
