//! Glyph metrics of the base-14 Helvetica faces
//!
//! Advance widths in 1/1000 em for the printable ASCII and Latin-1 ranges of
//! WinAnsiEncoding, taken from the Adobe core font AFM files. Text is measured
//! through [`encode_char`], the same mapping the PDF writer prints with.

/// Millimetres per PostScript point
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Ellipsis appended to truncated text
pub const ELLIPSIS: &str = "...";

/// Printed in place of characters the encoding has no glyph for
pub const REPLACEMENT: u8 = b'?';

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // ' ' .. '/'
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // '0' .. '?'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // '@' .. 'O'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 'P' .. '_'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // '`' .. 'o'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 'p' .. '~'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    // 0xA0 .. 0xAF
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0 .. 0xBF
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0 .. 0xCF
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0 .. 0xDF
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0 .. 0xEF
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0 .. 0xFF
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi byte printed for `c`.
///
/// Control characters print as a space; anything without a glyph in the
/// ASCII or Latin-1 range prints as [`REPLACEMENT`].
pub fn encode_char(c: char) -> u8 {
    match u32::from(c) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        code if code < 0x20 => b' ',
        _ => REPLACEMENT,
    }
}

/// Font face used by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// PostScript name of the base-14 face
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    fn tables(&self) -> (&'static [u16; 95], &'static [u16; 96]) {
        match self {
            Font::Regular => (&HELVETICA, &HELVETICA_LATIN1),
            Font::Bold => (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1),
        }
    }

    /// Advance width of the glyph `c` prints as
    pub fn char_width(&self, c: char) -> u16 {
        let (ascii, latin1) = self.tables();
        match encode_char(c) {
            code @ 0x20..=0x7E => ascii[usize::from(code - 0x20)],
            code @ 0xA0..=0xFF => latin1[usize::from(code - 0xA0)],
            _ => ascii[usize::from(REPLACEMENT - 0x20)],
        }
    }

    /// Rendered width of `text` in millimetres at `size_pt`
    pub fn text_width(&self, text: &str, size_pt: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        f64::from(units) * size_pt / 1000.0 * MM_PER_PT
    }
}
