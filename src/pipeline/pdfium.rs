//! PDF text extraction via pdfium.
//!
//! Two modes per page:
//!
//! * **layout** — rebuild lines from each glyph's bounding box, placing
//!   glyphs on a fixed character grid so columns and indentation survive
//!   (listings keep their leading line numbers, tables keep their gaps).
//! * **plain** — the page's text layer exactly as pdfium returns it.
//!
//! Layout mode fails when the page has text but pdfium reports no glyph
//! boxes for it; [`crate::pipeline::extract`] then retries in plain mode.

use crate::error::{ExtractError, ScrubError};
use crate::pipeline::extract::{PdfBackend, PdfPages};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Width of one layout column, in PDF points.
const X_DENSITY: f32 = 7.25;

/// Height of one layout row, in PDF points.
const Y_DENSITY: f32 = 13.0;

/// Environment variable pointing at an existing pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library.
///
/// Resolution order: `PDFIUM_LIB_PATH`, a library in the working
/// directory, then the system library search path.
pub fn bind_pdfium() -> Result<Pdfium, ScrubError> {
    let bindings = match std::env::var(PDFIUM_LIB_PATH_ENV) {
        Ok(path) if !path.is_empty() => {
            debug!("Binding pdfium from {PDFIUM_LIB_PATH_ENV}={path}");
            Pdfium::bind_to_library(&path)
        }
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| ScrubError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// [`PdfBackend`] backed by pdfium-render.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Bind pdfium with [`bind_pdfium`] and wrap it.
    pub fn bind() -> Result<Self, ScrubError> {
        Ok(Self::new(bind_pdfium()?))
    }
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfPages + 'a>, ExtractError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| classify_load_error(path, &format!("{:?}", e)))?;

        info!(
            "PDF loaded: {} ({} pages)",
            path.display(),
            document.pages().len()
        );
        Ok(Box::new(PdfiumPages { document }))
    }
}

/// Map a pdfium load failure onto the document error taxonomy.
fn classify_load_error(path: &Path, detail: &str) -> ExtractError {
    if detail.contains("FormatError") {
        ExtractError::Malformed {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    } else if detail.contains("Password") || detail.contains("password") {
        ExtractError::Other {
            path: path.to_path_buf(),
            detail: format!("encrypted document: {detail}"),
        }
    } else {
        ExtractError::Other {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumPages<'a> {
    fn page(&self, index: usize) -> Result<PdfPage<'a>, String> {
        let index = PdfPageIndex::try_from(index)
            .map_err(|_| format!("page {} out of range", index + 1))?;
        self.document
            .pages()
            .get(index)
            .map_err(|e| format!("{:?}", e))
    }
}

impl PdfPages for PdfiumPages<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    #[allow(deprecated)] // PdfRect field access deprecated in 0.8.28
    fn layout_text(&self, index: usize) -> Result<String, String> {
        let page = self.page(index)?;
        let text = page.text().map_err(|e| format!("{:?}", e))?;

        let mut glyphs = Vec::new();
        for ch in text.chars().iter() {
            if let (Some(c), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) {
                glyphs.push(Glyph {
                    ch: c,
                    x: rect.left.value,
                    y: rect.bottom.value,
                    width: (rect.right.value - rect.left.value).abs(),
                    height: (rect.top.value - rect.bottom.value).abs(),
                });
            }
        }

        if glyphs.iter().all(|g| g.ch.is_whitespace()) {
            if text.all().trim().is_empty() {
                return Ok(String::new());
            }
            return Err("text layer has no positioned glyphs".to_string());
        }

        Ok(layout_glyphs(&glyphs))
    }

    fn plain_text(&self, index: usize) -> Result<String, String> {
        let page = self.page(index)?;
        let text = page.text().map_err(|e| format!("{:?}", e))?;
        Ok(text.all())
    }
}

// ── Layout reconstruction ────────────────────────────────────────────────

/// A positioned glyph in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Glyph {
    pub ch: char,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Lay glyphs out on a character grid, top to bottom.
///
/// Glyphs whose baselines are within half a glyph height share a line. A
/// glyph lands in column `x / X_DENSITY`; when that column is already taken
/// but there is a visible gap to the previous glyph, one space is inserted
/// instead. Vertical gaps larger than one row become blank lines. Every
/// emitted line ends with `\n`.
pub(crate) fn layout_glyphs(glyphs: &[Glyph]) -> String {
    let mut visible: Vec<Glyph> = glyphs
        .iter()
        .copied()
        .filter(|g| !g.ch.is_whitespace() && !g.ch.is_control())
        .collect();
    if visible.is_empty() {
        return String::new();
    }

    visible.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<Glyph>> = Vec::new();
    for glyph in visible {
        match lines.last_mut() {
            Some(line) if same_line(line[0], glyph) => line.push(glyph),
            _ => lines.push(vec![glyph]),
        }
    }

    let mut out = String::new();
    let mut prev_y: Option<f32> = None;
    for mut line in lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = line[0].y;

        if let Some(py) = prev_y {
            let rows = ((py - y) / Y_DENSITY).round() as usize;
            for _ in 1..rows {
                out.push('\n');
            }
        }
        prev_y = Some(y);

        out.push_str(&render_line(&line));
        out.push('\n');
    }
    out
}

fn same_line(anchor: Glyph, glyph: Glyph) -> bool {
    let tolerance = (anchor.height * 0.5).max(1.0);
    (anchor.y - glyph.y).abs() <= tolerance
}

fn render_line(line: &[Glyph]) -> String {
    let mut s = String::new();
    let mut cols = 0usize;
    let mut prev_right: Option<f32> = None;

    for g in line {
        let target = (g.x.max(0.0) / X_DENSITY).round() as usize;
        if target > cols {
            s.extend(std::iter::repeat_n(' ', target - cols));
            cols = target;
        } else if let Some(right) = prev_right {
            if g.x - right > g.width.max(1.0) * 0.3 {
                s.push(' ');
                cols += 1;
            }
        }
        s.push(g.ch);
        cols += 1;
        prev_right = Some(g.x + g.width);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x: f32, y: f32) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| Glyph {
                ch,
                x: x + i as f32 * X_DENSITY,
                y,
                width: 6.0,
                height: 10.0,
            })
            .collect()
    }

    #[test]
    fn test_single_line() {
        let glyphs = word("hello", 0.0, 700.0);
        assert_eq!(layout_glyphs(&glyphs), "hello\n");
    }

    #[test]
    fn test_indentation_preserved() {
        let mut glyphs = word("def", 0.0, 700.0);
        glyphs.extend(word("x", 4.0 * X_DENSITY, 687.0));
        assert_eq!(layout_glyphs(&glyphs), "def\n    x\n");
    }

    #[test]
    fn test_lines_ordered_top_to_bottom() {
        let mut glyphs = word("second", 0.0, 687.0);
        glyphs.extend(word("first", 0.0, 700.0));
        assert_eq!(layout_glyphs(&glyphs), "first\nsecond\n");
    }

    #[test]
    fn test_vertical_gap_becomes_blank_lines() {
        let mut glyphs = word("top", 0.0, 700.0);
        glyphs.extend(word("bottom", 0.0, 700.0 - 3.0 * Y_DENSITY));
        assert_eq!(layout_glyphs(&glyphs), "top\n\n\nbottom\n");
    }

    #[test]
    fn test_columns_padded() {
        let mut glyphs = word("a", 0.0, 700.0);
        glyphs.extend(word("b", 10.0 * X_DENSITY, 700.5));
        assert_eq!(layout_glyphs(&glyphs), "a         b\n");
    }

    #[test]
    fn test_whitespace_glyphs_ignored() {
        let mut glyphs = word("ab", 0.0, 700.0);
        glyphs.push(Glyph {
            ch: ' ',
            x: 2.0 * X_DENSITY,
            y: 700.0,
            width: 3.0,
            height: 10.0,
        });
        assert_eq!(layout_glyphs(&glyphs), "ab\n");
        assert_eq!(layout_glyphs(&glyphs[2..]), "");
    }

    #[test]
    fn test_classify_load_error() {
        let p = Path::new("x.pdf");
        assert!(matches!(
            classify_load_error(p, "PdfiumLibraryInternalError(FormatError)"),
            ExtractError::Malformed { .. }
        ));
        assert!(matches!(
            classify_load_error(p, "PdfiumLibraryInternalError(PasswordError)"),
            ExtractError::Other { .. }
        ));
        assert!(matches!(
            classify_load_error(p, "PdfiumLibraryInternalError(FileError)"),
            ExtractError::Other { .. }
        ));
    }
}
