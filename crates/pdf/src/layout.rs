//! Positioned text spans from PDF content streams.
//!
//! Walks the text-showing operators of each page while tracking the graphics and text
//! matrices, so every drawn string is reported with its page-space origin and effective
//! font size. Strings are decoded with the page's fonts (see [`crate::fonts`]). Glyph
//! widths are estimated from the font size; the estimate only has to be good enough to
//! tell adjacent words from column gaps.

use crate::errors::LayoutError;
use crate::fonts::PageFonts;
use pdf::content::{Matrix, Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use tracing::debug;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// `TJ` adjustments more negative than this (thousandths of an em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// A run of text drawn by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge in page space.
    pub x: f32,
    /// Baseline in page space (PDF coordinates, origin bottom-left).
    pub y: f32,
    /// Estimated advance width in page space.
    pub width: f32,
    /// Effective font size in page space.
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: &str, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.to_string(),
            x,
            y,
            width: estimate_width(text, font_size),
            font_size,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH_FACTOR
}

/// An affine transform in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(tx: f32, ty: f32) -> Self {
        Transform {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self` applied first, then `other`.
    fn then(self, other: Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

impl From<&Matrix> for Transform {
    fn from(m: &Matrix) -> Self {
        Transform {
            a: m.a,
            b: m.b,
            c: m.c,
            d: m.d,
            e: m.e,
            f: m.f,
        }
    }
}

/// Text state carried across the operators of one content stream.
struct TextState<'a> {
    fonts: &'a PageFonts,
    /// Resource name of the current font.
    font: Option<String>,
    ctm: Transform,
    saved: Vec<Transform>,
    text_matrix: Transform,
    line_matrix: Transform,
    font_size: f32,
    leading: f32,
    spans: Vec<TextSpan>,
}

impl<'a> TextState<'a> {
    fn new(fonts: &'a PageFonts) -> Self {
        Self {
            fonts,
            font: None,
            ctm: Transform::IDENTITY,
            saved: Vec::new(),
            text_matrix: Transform::IDENTITY,
            line_matrix: Transform::IDENTITY,
            font_size: 12.0,
            leading: 0.0,
            spans: Vec::new(),
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Transform::translate(tx, ty).then(self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// Records `text` at the current position and advances the text matrix past it.
    fn show(&mut self, text: String, extra_advance: f32) {
        let text_advance = estimate_width(&text, self.font_size) + extra_advance;
        if !text.trim().is_empty() {
            let device = self.text_matrix.then(self.ctm);
            let scale = device.vertical_scale();
            let font_size = if scale > 0.0 {
                self.font_size * scale
            } else {
                self.font_size
            };
            let width = text_advance * device.a.hypot(device.b);
            self.spans.push(TextSpan {
                text,
                x: device.e,
                y: device.f,
                width,
                font_size,
            });
        }
        self.text_matrix = Transform::translate(text_advance, 0.0).then(self.text_matrix);
    }

    fn apply(&mut self, op: &Op) {
        match op {
            Op::Save => self.saved.push(self.ctm),
            Op::Restore => {
                if let Some(ctm) = self.saved.pop() {
                    self.ctm = ctm;
                }
            }
            Op::Transform { matrix } => self.ctm = Transform::from(matrix).then(self.ctm),
            Op::BeginText => {
                self.text_matrix = Transform::IDENTITY;
                self.line_matrix = Transform::IDENTITY;
            }
            Op::SetTextMatrix { matrix } => {
                self.line_matrix = Transform::from(matrix);
                self.text_matrix = self.line_matrix;
            }
            Op::MoveTextPosition { translation } => self.next_line(translation.x, translation.y),
            Op::TextNewline => self.next_line(0.0, -self.leading),
            Op::Leading { leading } => self.leading = *leading,
            Op::TextFont { name, size } => {
                self.font = Some(name.as_str().to_string());
                self.font_size = *size;
            }
            Op::TextDraw { text } => {
                let decoded = self.fonts.decode(self.font.as_deref(), text);
                self.show(decoded, 0.0);
            }
            Op::TextDrawAdjusted { array } => {
                let mut joined = String::new();
                let mut adjustment = 0.0;
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(text) => {
                            joined.push_str(&self.fonts.decode(self.font.as_deref(), text));
                        }
                        TextDrawAdjusted::Spacing(amount) => {
                            if *amount < TJ_SPACE_THRESHOLD && !joined.ends_with(' ') {
                                joined.push(' ');
                            }
                            adjustment -= amount / 1000.0 * self.font_size;
                        }
                    }
                }
                self.show(joined, adjustment);
            }
            _ => {}
        }
    }
}

/// Collects the text spans drawn by a sequence of content operators, in stream order.
///
/// Strings are decoded with the page's `fonts`.
pub fn spans_from_ops(ops: &[Op], fonts: &PageFonts) -> Vec<TextSpan> {
    let mut state = TextState::new(fonts);
    for op in ops {
        state.apply(op);
    }
    state.spans
}

/// Opens `pdf_data` and calls `on_page` with the 1-indexed page number and the page's
/// spans, in page order. Returns the page count.
///
/// Each call opens the document afresh; callers never share parser state.
pub(crate) fn walk_pages<F>(pdf_data: &[u8], mut on_page: F) -> Result<u32, LayoutError>
where
    F: FnMut(u32, Vec<TextSpan>),
{
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| LayoutError::Open(e.to_string()))?;
    let resolver = file.resolver();
    let page_count = file.num_pages();
    debug!(page_count, "Opened PDF");

    for index in 0..page_count {
        let page_error = |reason: String| LayoutError::Page {
            page: index + 1,
            page_count,
            reason,
        };
        let page = file
            .get_page(index)
            .map_err(|e| page_error(e.to_string()))?;
        let spans = match &page.contents {
            Some(content) => {
                let operations = content
                    .operations(&resolver)
                    .map_err(|e| page_error(e.to_string()))?;
                let fonts = match page.resources() {
                    Ok(resources) => PageFonts::load(resources, &resolver),
                    Err(e) => {
                        debug!(page = index + 1, error = %e, "Page has no resources");
                        PageFonts::default()
                    }
                };
                spans_from_ops(&operations, &fonts)
            }
            None => Vec::new(),
        };
        on_page(index + 1, spans);
    }

    Ok(page_count)
}
