//! Rendering surface the painter draws onto

use super::metrics::Font;

/// Page orientation, fixed for a whole report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// A4 page size `(width, height)` in millimetres
    pub fn page_size(&self) -> (f64, f64) {
        match self {
            Orientation::Portrait => (A4_SHORT, A4_LONG),
            Orientation::Landscape => (A4_LONG, A4_SHORT),
        }
    }
}

const A4_SHORT: f64 = 210.0;
const A4_LONG: f64 = 297.0;

/// Horizontal text alignment inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Rectangle in millimetres, origin at the top-left of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// A paginated drawing target that produces a document byte stream.
///
/// Coordinates are millimetres from the top-left corner of the current page.
pub trait Surface {
    /// Start a new page; every page of a report shares one orientation
    fn add_page(&mut self, orientation: Orientation);

    /// Select the font for subsequent text and measurement
    fn set_font(&mut self, font: Font, size_pt: f64);

    /// Currently selected font
    fn font(&self) -> (Font, f64);

    /// Width of `text` in the current font
    fn string_width(&self, text: &str) -> f64 {
        let (font, size) = self.font();
        font.text_width(text, size)
    }

    /// Draw `text` inside `rect`, optionally with a border around the rectangle
    fn cell(&mut self, rect: Rect, text: &str, align: Align, border: bool);

    fn line(&mut self, from: (f64, f64), to: (f64, f64));

    /// Start a new page when a block of `height` placed at `y` would cross the
    /// bottom margin. Returns the y to place the block at instead, if it broke.
    fn break_page(&mut self, y: f64, height: f64) -> Option<f64>;

    fn finish(self) -> Vec<u8>
    where
        Self: Sized;
}
