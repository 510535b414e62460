//! Table geometry: orientation, column widths, font sizes and header lines
//!
//! Everything here is pure and measured with the static Helvetica metrics, so
//! a layout can be planned and checked without a surface.

use super::metrics::{Font, ELLIPSIS, MM_PER_PT};
use super::surface::{Align, Orientation};
use crate::config::ReportConfig;
use crate::model::CriterionField;

/// Horizontal padding inside every cell (mm)
pub const CELL_PADDING: f64 = 1.0;

/// Text room never drops below this, however narrow the column (mm)
pub const MIN_TEXT_WIDTH: f64 = 2.0;

pub const RANK_LABEL: &str = "Rank";
pub const NAME_LABEL: &str = "Contestant";
pub const TOTAL_LABEL: &str = "Total";

const HEADER_LINE_SPACING: f64 = 1.25;
const ROW_SPACING: f64 = 1.8;

/// What a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Rank,
    Name,
    /// Index into the ordered criteria
    Criterion(usize),
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub kind: ColumnKind,
    pub label: String,
    pub width: f64,
    pub align: Align,
}

impl Column {
    /// Width available to text once padding is taken off
    pub fn text_room(&self) -> f64 {
        text_room(self.width)
    }
}

pub fn text_room(width: f64) -> f64 {
    (width - 2.0 * CELL_PADDING).max(MIN_TEXT_WIDTH)
}

/// Fixed geometry of one report
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub orientation: Orientation,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub columns: Vec<Column>,
    /// Header text per column, one or two lines, each fitting its column
    pub header_lines: Vec<Vec<String>>,
    pub header_font: f64,
    pub body_font: f64,
    pub header_height: f64,
    pub row_height: f64,
}

impl TableLayout {
    pub fn table_width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

pub fn choose_orientation(config: &ReportConfig, criteria: usize, rows: usize) -> Orientation {
    if criteria > config.landscape_criteria_over || rows > config.landscape_rows_over {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

/// Width of each criterion column: the room left after the fixed columns,
/// shared evenly and floored at the configured minimum.
pub fn criterion_width(config: &ReportConfig, page_width: f64, criteria: usize) -> f64 {
    if criteria == 0 {
        return config.min_criterion_width;
    }
    let usable = page_width - 2.0 * config.margin;
    let remaining = usable - config.rank_width - config.name_width - config.total_width;
    (remaining / criteria as f64).max(config.min_criterion_width)
}

/// Header font: one point above the body, capped
pub fn header_font_size(config: &ReportConfig, body: f64) -> f64 {
    (body + 1.0).min(config.max_header_font_size)
}

/// Best two-line split of `label` at a word boundary.
///
/// Tries every partition and keeps the one whose wider line is narrowest.
/// Returns `None` for single-word labels.
pub fn split_label(label: &str, font: Font, size: f64) -> Option<(String, String)> {
    let words: Vec<&str> = label.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }

    (1..words.len())
        .map(|at| {
            let first = words[..at].join(" ");
            let second = words[at..].join(" ");
            let wider = font
                .text_width(&first, size)
                .max(font.text_width(&second, size));
            (wider, first, second)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, first, second)| (first, second))
}

/// Lines for `label` within `room`, or `None` if neither one line nor the best
/// split fits
pub fn fit_label(label: &str, font: Font, size: f64, room: f64) -> Option<Vec<String>> {
    if font.text_width(label, size) <= room {
        return Some(vec![label.to_string()]);
    }
    let (first, second) = split_label(label, font, size)?;
    if font.text_width(&first, size) <= room && font.text_width(&second, size) <= room {
        Some(vec![first, second])
    } else {
        None
    }
}

/// Cut `text` from the end and append an ellipsis until it fits `room`.
///
/// Never returns less than the ellipsis itself.
pub fn truncate(text: &str, font: Font, size: f64, room: f64) -> String {
    if font.text_width(text, size) <= room {
        return text.to_string();
    }

    let ellipsis = font.text_width(ELLIPSIS, size);
    let mut kept: Vec<char> = text.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        let prefix: String = kept.iter().collect();
        if font.text_width(&prefix, size) + ellipsis <= room {
            return format!("{prefix}{ELLIPSIS}");
        }
    }
    ELLIPSIS.to_string()
}

/// Candidate header sizes: `start`, then one point less each step, ending at `floor`
fn header_sizes(start: f64, floor: f64) -> Vec<f64> {
    let mut sizes = Vec::new();
    let mut size = start;
    while size > floor {
        sizes.push(size);
        size -= 1.0;
    }
    sizes.push(floor);
    sizes
}

/// Largest header size at which every label fits its column.
///
/// At the floor size, lines that still overflow are truncated.
pub fn fit_headers(columns: &[Column], start: f64, floor: f64) -> (f64, Vec<Vec<String>>) {
    let font = Font::Bold;

    for size in header_sizes(start, floor) {
        let fitted: Option<Vec<Vec<String>>> = columns
            .iter()
            .map(|c| fit_label(&c.label, font, size, c.text_room()))
            .collect();
        if let Some(lines) = fitted {
            return (size, lines);
        }
    }

    let lines = columns
        .iter()
        .map(|c| {
            let room = c.text_room();
            let lines = match fit_label(&c.label, font, floor, room) {
                Some(lines) => lines,
                None => match split_label(&c.label, font, floor) {
                    Some((first, second)) => vec![first, second],
                    None => vec![c.label.clone()],
                },
            };
            lines
                .iter()
                .map(|line| truncate(line, font, floor, room))
                .collect()
        })
        .collect();
    (floor, lines)
}

fn build_columns(config: &ReportConfig, fields: &[CriterionField], crit_width: f64) -> Vec<Column> {
    let mut columns = Vec::with_capacity(fields.len() + 3);
    columns.push(Column {
        kind: ColumnKind::Rank,
        label: RANK_LABEL.to_string(),
        width: config.rank_width,
        align: Align::Center,
    });
    columns.push(Column {
        kind: ColumnKind::Name,
        label: NAME_LABEL.to_string(),
        width: config.name_width,
        align: Align::Left,
    });
    columns.extend(fields.iter().enumerate().map(|(i, field)| Column {
        kind: ColumnKind::Criterion(i),
        label: field.label.clone(),
        width: crit_width,
        align: Align::Center,
    }));
    columns.push(Column {
        kind: ColumnKind::Total,
        label: TOTAL_LABEL.to_string(),
        width: config.total_width,
        align: Align::Right,
    });
    columns
}

/// Plan the whole table for `rows` result rows over the ordered criteria
pub fn plan_table(config: &ReportConfig, fields: &[CriterionField], rows: usize) -> TableLayout {
    let orientation = choose_orientation(config, fields.len(), rows);
    let (page_width, page_height) = orientation.page_size();

    let crit_width = criterion_width(config, page_width, fields.len());
    let columns = build_columns(config, fields, crit_width);

    let body_font = config.body_font_size(fields.len(), rows);
    let start = header_font_size(config, body_font);
    let (header_font, header_lines) = fit_headers(&columns, start, config.min_font_size);

    let line_count = header_lines.iter().map(Vec::len).max().unwrap_or(1);
    let header_height =
        line_count as f64 * header_font * MM_PER_PT * HEADER_LINE_SPACING + 2.0 * CELL_PADDING;
    let row_height = body_font * MM_PER_PT * ROW_SPACING;

    TableLayout {
        orientation,
        page_width,
        page_height,
        margin: config.margin,
        columns,
        header_lines,
        header_font,
        body_font,
        header_height,
        row_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CriterionId;

    fn fields(labels: &[&str]) -> Vec<CriterionField> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| CriterionField {
                id: CriterionId(i as i64 + 1),
                label: label.to_string(),
                max_score: 10.0,
            })
            .collect()
    }

    fn assert_headers_fit(layout: &TableLayout) {
        for (column, lines) in layout.columns.iter().zip(&layout.header_lines) {
            assert!(!lines.is_empty() && lines.len() <= 2, "{lines:?}");
            for line in lines {
                let width = Font::Bold.text_width(line, layout.header_font);
                assert!(
                    width <= column.text_room() + 1e-9,
                    "{line:?} is {width}mm in a {}mm column",
                    column.text_room()
                );
            }
        }
    }

    #[test]
    fn test_orientation_thresholds() {
        let config = ReportConfig::default();
        assert_eq!(choose_orientation(&config, 4, 15), Orientation::Portrait);
        assert_eq!(choose_orientation(&config, 5, 1), Orientation::Landscape);
        assert_eq!(choose_orientation(&config, 1, 16), Orientation::Landscape);
    }

    #[test]
    fn test_criterion_width_shares_remaining_room() {
        let config = ReportConfig::default();
        // Portrait: 210 - 20 margins - 14 - 50 - 22 = 104 over 4 criteria
        assert!((criterion_width(&config, 210.0, 4) - 26.0).abs() < 1e-9);
        // Floored once the share gets thin
        assert_eq!(criterion_width(&config, 297.0, 12), 18.0);
    }

    #[test]
    fn test_header_font_one_above_body_capped() {
        let mut config = ReportConfig::default();
        assert_eq!(header_font_size(&config, 9.0), 10.0);
        config.max_header_font_size = 10.5;
        assert_eq!(header_font_size(&config, 10.0), 10.5);
    }

    #[test]
    fn test_split_is_min_max_not_midpoint() {
        // No other word boundary gives a narrower wider line
        let (first, second) =
            split_label("Choreography and Stage Use (25%)", Font::Bold, 10.0).unwrap();
        let wider = Font::Bold
            .text_width(&first, 10.0)
            .max(Font::Bold.text_width(&second, 10.0));

        let words: Vec<&str> = "Choreography and Stage Use (25%)".split_whitespace().collect();
        for at in 1..words.len() {
            let a = Font::Bold.text_width(&words[..at].join(" "), 10.0);
            let b = Font::Bold.text_width(&words[at..].join(" "), 10.0);
            assert!(wider <= a.max(b) + 1e-9);
        }
        assert_eq!(format!("{first} {second}"), "Choreography and Stage Use (25%)");
    }

    #[test]
    fn test_single_word_cannot_split() {
        assert!(split_label("Rank", Font::Bold, 10.0).is_none());
    }

    #[test]
    fn test_truncate_keeps_ellipsis_floor() {
        let text = "Bartholomew Fitzgerald-Montgomery";
        let room = 20.0;
        let cut = truncate(text, Font::Regular, 10.0, room);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(Font::Regular.text_width(&cut, 10.0) <= room);
        assert!(cut.len() > ELLIPSIS.len());

        assert_eq!(truncate(text, Font::Regular, 10.0, 0.5), ELLIPSIS);
        assert_eq!(truncate("Amy", Font::Regular, 10.0, room), "Amy");
    }

    #[test]
    fn test_long_labels_drop_header_font() {
        let config = ReportConfig::default();
        let labels = [
            "Interpretation and Emotional Delivery (20%)",
            "Technique (20%)",
            "Costume (20%)",
            "Stagecraft (20%)",
            "Overall Impression and Audience Engagement (20%)",
        ];
        let layout = plan_table(&config, &fields(&labels), 3);
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert!(layout.header_font <= header_font_size(&config, layout.body_font));
        assert!(layout.header_font >= config.min_font_size);
        assert_headers_fit(&layout);
    }

    #[test]
    fn test_headers_fit_across_shapes() {
        let config = ReportConfig::default();
        let long = "Extraordinarily Comprehensive Musicianship Assessment Including Sight Reading (7.5%)";
        for criteria in [1, 3, 5, 8, 12] {
            for rows in [1, 16, 45, 80] {
                let labels: Vec<String> = (0..criteria)
                    .map(|i| if i % 2 == 0 { long.to_string() } else { format!("C{i} (5%)") })
                    .collect();
                let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
                let layout = plan_table(&config, &fields(&refs), rows);
                assert_headers_fit(&layout);
                assert!(layout.header_font >= config.min_font_size);
            }
        }
    }

    #[test]
    fn test_unsplittable_word_truncated_at_floor() {
        let columns = vec![Column {
            kind: ColumnKind::Criterion(0),
            label: "Supercalifragilisticexpialidociousness (100%)".to_string(),
            width: 18.0,
            align: Align::Center,
        }];

        let (size, lines) = fit_headers(&columns, 11.0, 6.0);
        assert_eq!(size, 6.0);
        assert_eq!(lines[0].len(), 2);
        assert!(lines[0][0].ends_with(ELLIPSIS));
        assert_eq!(lines[0][1], "(100%)");
        for line in &lines[0] {
            assert!(Font::Bold.text_width(line, size) <= columns[0].text_room());
        }
    }

    #[test]
    fn test_non_latin_labels_fit_as_printed() {
        let config = ReportConfig::default();
        let labels = [
            "评分标准评分标准 (25%)",
            "Æsthetik und Ausdruck (25%)",
            "Présence scénique (25%)",
            "Ünïcödé ✓✓✓✓✓✓✓✓✓✓✓✓ (25%)",
        ];
        for rows in [2, 60] {
            let layout = plan_table(&config, &fields(&labels), rows);
            assert_headers_fit(&layout);
        }

        // Glyphs outside Latin-1 print as `?` and take its bold width
        let size = header_font_size(&config, 10.0);
        assert_eq!(
            Font::Bold.text_width("评分标准", size),
            Font::Bold.text_width("????", size)
        );
        assert!(Font::Bold.text_width("Æ", size) > Font::Bold.text_width("A", size));
    }

    #[test]
    fn test_unsplittable_non_latin_label_truncated() {
        let columns = vec![Column {
            kind: ColumnKind::Criterion(0),
            label: "评分标准评分标准评分标准".to_string(),
            width: 12.0,
            align: Align::Center,
        }];

        let (size, lines) = fit_headers(&columns, 11.0, 6.0);
        assert_eq!(size, 6.0);
        assert_eq!(lines[0].len(), 1);
        assert!(lines[0][0].ends_with(ELLIPSIS));
        assert!(Font::Bold.text_width(&lines[0][0], size) <= columns[0].text_room());
    }

    #[test]
    fn test_fixed_columns_surround_criteria() {
        let config = ReportConfig::default();
        let layout = plan_table(&config, &fields(&["A (50%)", "B (50%)"]), 2);
        let kinds: Vec<ColumnKind> = layout.columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Rank,
                ColumnKind::Name,
                ColumnKind::Criterion(0),
                ColumnKind::Criterion(1),
                ColumnKind::Total
            ]
        );
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert_eq!(layout.body_font, 10.0);
        assert_eq!(layout.header_font, 11.0);
    }
}
