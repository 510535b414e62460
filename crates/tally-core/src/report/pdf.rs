//! Minimal PDF 1.4 writer over the base-14 Helvetica faces
//!
//! Enough of the format for a text grid: pages, two fonts, text runs, stroked
//! rectangles and lines. Text is encoded as WinAnsi; characters outside
//! the printable ASCII and Latin-1 ranges print as `?`.

use std::io::Write;

use super::layout::CELL_PADDING;
use super::metrics::{encode_char, Font, MM_PER_PT};
use super::surface::{Align, Orientation, Rect, Surface};

const LINE_WIDTH_PT: f64 = 0.2;
/// Baseline offset below the vertical centre, as a share of the font size
const BASELINE_SHIFT: f64 = 0.3;

fn pt(mm: f64) -> f64 {
    mm / MM_PER_PT
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
    }
}

/// Escape a string literal for a content stream
fn encode_text(text: &str, out: &mut Vec<u8>) {
    out.push(b'(');
    for c in text.chars() {
        let byte = encode_char(c);
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
}

#[derive(Debug)]
struct Page {
    orientation: Orientation,
    content: Vec<u8>,
}

impl Page {
    fn new(orientation: Orientation) -> Self {
        let mut content = Vec::new();
        let _ = writeln!(content, "{LINE_WIDTH_PT:.2} w");
        Page {
            orientation,
            content,
        }
    }

    fn height_pt(&self) -> f64 {
        pt(self.orientation.page_size().1)
    }
}

/// Renders into an in-memory PDF document
#[derive(Debug)]
pub struct PdfSurface {
    margin: f64,
    orientation: Orientation,
    pages: Vec<Page>,
    font: Font,
    size: f64,
}

impl PdfSurface {
    /// `margin` is the bottom margin that triggers page breaks (mm)
    pub fn new(margin: f64) -> Self {
        PdfSurface {
            margin,
            orientation: Orientation::Portrait,
            pages: Vec::new(),
            font: Font::Regular,
            size: 10.0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::new(self.orientation));
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl Surface for PdfSurface {
    fn add_page(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.pages.push(Page::new(orientation));
    }

    fn set_font(&mut self, font: Font, size_pt: f64) {
        self.font = font;
        self.size = size_pt;
    }

    fn font(&self) -> (Font, f64) {
        (self.font, self.size)
    }

    fn cell(&mut self, rect: Rect, text: &str, align: Align, border: bool) {
        let (font, size) = (self.font, self.size);
        let text_width = self.string_width(text);
        let page = self.page();
        let height = page.height_pt();

        if border {
            let _ = writeln!(
                page.content,
                "{:.2} {:.2} {:.2} {:.2} re S",
                pt(rect.x),
                height - pt(rect.y + rect.h),
                pt(rect.w),
                pt(rect.h)
            );
        }

        if text.is_empty() {
            return;
        }

        let x = match align {
            Align::Left => rect.x + CELL_PADDING,
            Align::Center => rect.x + (rect.w - text_width) / 2.0,
            Align::Right => rect.x + rect.w - CELL_PADDING - text_width,
        };
        let baseline = rect.y + rect.h / 2.0 + BASELINE_SHIFT * size * MM_PER_PT;

        let _ = write!(
            page.content,
            "BT /{} {:.2} Tf {:.2} {:.2} Td ",
            font_resource(font),
            size,
            pt(x),
            height - pt(baseline)
        );
        encode_text(text, &mut page.content);
        page.content.extend_from_slice(b" Tj ET\n");
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let page = self.page();
        let height = page.height_pt();
        let _ = writeln!(
            page.content,
            "{:.2} {:.2} m {:.2} {:.2} l S",
            pt(from.0),
            height - pt(from.1),
            pt(to.0),
            height - pt(to.1)
        );
    }

    fn break_page(&mut self, y: f64, height: f64) -> Option<f64> {
        let page_height = self.orientation.page_size().1;
        if y + height > page_height - self.margin {
            self.add_page(self.orientation);
            Some(self.margin)
        } else {
            None
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.pages.is_empty() {
            self.pages.push(Page::new(self.orientation));
        }

        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 5 + 2 * i).collect();
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();

        let mut object = |out: &mut Vec<u8>, body: &[u8]| {
            offsets.push(out.len());
            let id = offsets.len();
            let _ = writeln!(out, "{id} 0 obj");
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        };

        object(&mut out, b"<< /Type /Catalog /Pages 2 0 R >>");
        object(
            &mut out,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            )
            .as_bytes(),
        );
        for font in [Font::Regular, Font::Bold] {
            object(
                &mut out,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_font()
                )
                .as_bytes(),
            );
        }

        for (page, id) in self.pages.iter().zip(&page_ids) {
            let (w, h) = page.orientation.page_size();
            object(
                &mut out,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    pt(w),
                    pt(h),
                    id + 1
                )
                .as_bytes(),
            );

            let mut stream = format!("<< /Length {} >>\nstream\n", page.content.len()).into_bytes();
            stream.extend_from_slice(&page.content);
            stream.extend_from_slice(b"endstream");
            object(&mut out, &stream);
        }

        let xref = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = writeln!(out, "{offset:010} 00000 n ");
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            offsets.len() + 1
        );
        out
    }
}
