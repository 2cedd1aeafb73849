//! Plain-text extraction for Q&A context.

use crate::errors::{ExtractError, LayoutError};
use crate::layout::{walk_pages, TextSpan};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Gap between two spans on one line, as a fraction of font size, that reads as a space.
const WORD_GAP_FACTOR: f32 = 0.2;

/// Baseline shift, as a fraction of font size, that starts a new line.
const LINE_SHIFT_FACTOR: f32 = 0.4;

/// Text of the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextExtraction {
    /// Page texts in page order, each followed by a newline. Pages without text add
    /// nothing.
    pub text: String,
    /// Page count reported by the document, 0 when it could not be opened.
    pub page_count: u32,
    /// Set when extraction stopped early. `text` keeps everything read before the failure.
    #[serde(skip)]
    pub warning: Option<ExtractError>,
}

/// Extracts the document's text in a parse pass of its own.
///
/// Never fails: on error the text accumulated so far is kept and a warning is attached.
#[instrument(skip(pdf_data), fields(bytes = pdf_data.len()))]
pub fn extract_text(pdf_data: &[u8]) -> TextExtraction {
    let mut text = String::new();
    let mut pages_read = 0;

    let walked = walk_pages(pdf_data, |_, spans| {
        let page_text = page_text(&spans);
        if !page_text.is_empty() {
            text.push_str(&page_text);
            text.push('\n');
        }
        pages_read += 1;
    });

    match walked {
        Ok(page_count) => {
            info!(page_count, chars = text.chars().count(), "Text extraction finished");
            TextExtraction {
                text,
                page_count,
                warning: None,
            }
        }
        Err(e) => {
            warn!(error = %e, pages_read, "Text extraction stopped early");
            let page_count = match &e {
                LayoutError::Page { page_count, .. } => *page_count,
                LayoutError::Open(_) => 0,
            };
            TextExtraction {
                text,
                page_count,
                warning: Some(ExtractError::TextExtractionFailed {
                    pages_read,
                    reason: e.to_string(),
                }),
            }
        }
    }
}

/// Joins one page's spans in drawing order: same-baseline spans share a line, separated
/// by a space when there is a visible gap.
pub fn page_text(spans: &[TextSpan]) -> String {
    let mut out = String::new();
    let mut previous: Option<&TextSpan> = None;

    for span in spans {
        if let Some(prev) = previous {
            let size = prev.font_size.max(span.font_size);
            if (prev.y - span.y).abs() > size * LINE_SHIFT_FACTOR {
                out.push('\n');
            } else if span.x - prev.right() > size * WORD_GAP_FACTOR
                && !out.ends_with(' ')
                && !span.text.starts_with(' ')
            {
                out.push(' ');
            }
        }
        out.push_str(&span.text);
        previous = Some(span);
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_on_one_baseline_form_a_line() {
        let spans = vec![
            TextSpan::new("Annual", 72.0, 700.0, 12.0),
            TextSpan::new("leave", 120.0, 700.0, 12.0),
        ];
        assert_eq!(page_text(&spans), "Annual leave");
    }

    #[test]
    fn baseline_change_starts_a_new_line() {
        let spans = vec![
            TextSpan::new("First", 72.0, 700.0, 12.0),
            TextSpan::new("Second", 72.0, 680.0, 12.0),
        ];
        assert_eq!(page_text(&spans), "First\nSecond");
    }

    #[test]
    fn adjacent_spans_are_not_split() {
        let spans = vec![
            TextSpan::new("Hand", 72.0, 700.0, 10.0),
            TextSpan::new("book", 92.0, 700.0, 10.0),
        ];
        assert_eq!(page_text(&spans), "Handbook");
    }

    #[test]
    fn empty_page_yields_empty_text() {
        assert_eq!(page_text(&[]), "");
    }
}
