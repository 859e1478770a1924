//! Minimal single-page PDF writer.
//!
//! Records draw operations in millimetres with a top-left origin (the way
//! the invoice layout is written) and serializes them as a PDF 1.4 file
//! with one content stream and the two standard Helvetica faces, so no
//! fonts need embedding.
//!
//! Object layout of the output:
//!
//! | Id | Object                     |
//! |----|----------------------------|
//! | 1  | Catalog                    |
//! | 2  | Pages                      |
//! | 3  | Page                       |
//! | 4  | Font `F1` (Helvetica)      |
//! | 5  | Font `F2` (Helvetica-Bold) |
//! | 6  | Content stream             |

use std::fmt::Write as _;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// US letter page size in millimetres.
pub const LETTER_WIDTH_MM: f64 = 215.9;
pub const LETTER_HEIGHT_MM: f64 = 279.4;

// ---------------------------------------------------------------------------
// Draw operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn pdf_components(self) -> String {
        format!(
            "{} {} {}",
            component(self.0),
            component(self.1),
            component(self.2)
        )
    }
}

fn component(c: u8) -> String {
    trim_number(c as f64 / 255.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
        }
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillColor(Rgb),
    TextColor(Rgb),
    Font(Font, f64),
    /// Filled rectangle: x, y of the top-left corner, width, height (mm).
    Rect { x: f64, y: f64, w: f64, h: f64 },
    /// Text with its baseline starting at x, y (mm).
    Text { text: String, x: f64, y: f64 },
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A single page under construction.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    width_mm: f64,
    height_mm: f64,
    ops: Vec<DrawOp>,
}

impl PdfDocument {
    /// A blank US letter page.
    pub fn letter() -> Self {
        Self {
            width_mm: LETTER_WIDTH_MM,
            height_mm: LETTER_HEIGHT_MM,
            ops: Vec::new(),
        }
    }

    pub fn set_fill_color(&mut self, r: u8, g: u8, b: u8) {
        self.ops.push(DrawOp::FillColor(Rgb(r, g, b)));
    }

    pub fn set_text_color(&mut self, r: u8, g: u8, b: u8) {
        self.ops.push(DrawOp::TextColor(Rgb(r, g, b)));
    }

    pub fn set_font(&mut self, font: Font, size: f64) {
        self.ops.push(DrawOp::Font(font, size));
    }

    /// Fill a rectangle with the current fill colour.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::Rect { x, y, w, h });
    }

    /// Draw text in the current font and text colour.
    pub fn text(&mut self, text: impl Into<String>, x: f64, y: f64) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
        });
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Every text string drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Serialize the page as a complete PDF file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let content = self.content_stream();
        let width_pt = trim_number(self.width_mm * PT_PER_MM);
        let height_pt = trim_number(self.height_mm * PT_PER_MM);

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width_pt} {height_pt}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len() + 1);
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        offsets.push(out.len());
        out.extend_from_slice(
            format!("6 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes(),
        );
        out.extend_from_slice(&content);
        out.extend_from_slice(b"\nendstream\nendobj\n");

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }

    /// Translate the recorded ops into PDF content-stream operators.
    fn content_stream(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut fill = Rgb(0, 0, 0);
        let mut text_color = Rgb(0, 0, 0);
        let mut font = (Font::Helvetica, 16.0);

        for op in &self.ops {
            match op {
                DrawOp::FillColor(c) => fill = *c,
                DrawOp::TextColor(c) => text_color = *c,
                DrawOp::Font(f, size) => font = (*f, *size),
                DrawOp::Rect { x, y, w, h } => {
                    let line = format!(
                        "{} rg\n{} {} {} {} re f\n",
                        fill.pdf_components(),
                        trim_number(x * PT_PER_MM),
                        trim_number((self.height_mm - y - h) * PT_PER_MM),
                        trim_number(w * PT_PER_MM),
                        trim_number(h * PT_PER_MM),
                    );
                    out.extend_from_slice(line.as_bytes());
                }
                DrawOp::Text { text, x, y } => {
                    let head = format!(
                        "BT\n{} rg\n/{} {} Tf\n{} {} Td\n(",
                        text_color.pdf_components(),
                        font.0.resource_name(),
                        trim_number(font.1),
                        trim_number(x * PT_PER_MM),
                        trim_number((self.height_mm - y) * PT_PER_MM),
                    );
                    out.extend_from_slice(head.as_bytes());
                    out.extend_from_slice(&encode_text(text));
                    out.extend_from_slice(b") Tj\nET\n");
                }
            }
        }
        out
    }
}

/// Encode text as a PDF literal-string body: Latin-1 bytes with `\`, `(`
/// and `)` escaped. Characters outside Latin-1 become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\n' | '\r' => out.push(b' '),
            c if (c as u32) < 0x20 => {}
            c if (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Format a number with at most two decimals and no trailing zeros.
fn trim_number(n: f64) -> String {
    let s = format!("{n:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
