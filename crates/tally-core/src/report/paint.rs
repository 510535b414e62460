//! Paints a planned table onto a surface

use super::layout::{text_room, truncate, ColumnKind, TableLayout, CELL_PADDING};
use super::metrics::{Font, MM_PER_PT};
use super::surface::{Align, Rect, Surface};
use crate::aggregate::ResultRow;
use crate::model::CriterionField;

const TITLE_SIZE: f64 = 14.0;
const HEADING_SIZE: f64 = 11.0;
const TITLE_HEIGHT: f64 = 10.0;
const HEADING_HEIGHT: f64 = 8.0;
const HEADING_GAP: f64 = 4.0;

/// Lines printed above the table on the first page
#[derive(Debug, Clone)]
pub struct Heading<'a> {
    pub title: &'a str,
    pub event: &'a str,
    pub competition: &'a str,
}

/// Text of a criterion cell: weighted contribution, then the raw average
pub fn criterion_cell(weighted: f64, raw: f64) -> String {
    format!("{weighted:.4}({raw:.4})")
}

pub fn total_cell(total: f64) -> String {
    format!("{total:.2}")
}

fn cell_text(kind: ColumnKind, rank: usize, row: &ResultRow, fields: &[CriterionField]) -> String {
    match kind {
        ColumnKind::Rank => rank.to_string(),
        ColumnKind::Name => row.contestant.clone(),
        ColumnKind::Criterion(i) => {
            let id = fields[i].id;
            criterion_cell(
                row.per_criterion_weighted.get(&id).copied().unwrap_or(0.0),
                row.per_criterion_raw.get(&id).copied().unwrap_or(0.0),
            )
        }
        ColumnKind::Total => total_cell(row.total_weighted),
    }
}

fn paint_heading<S: Surface>(surface: &mut S, layout: &TableLayout, heading: &Heading) -> f64 {
    let width = layout.page_width - 2.0 * layout.margin;
    let x = layout.margin;
    let mut y = layout.margin;

    surface.set_font(Font::Bold, TITLE_SIZE);
    let title = truncate(heading.title, Font::Bold, TITLE_SIZE, text_room(width));
    surface.cell(Rect::new(x, y, width, TITLE_HEIGHT), &title, Align::Left, false);
    y += TITLE_HEIGHT;

    surface.set_font(Font::Regular, HEADING_SIZE);
    for line in [
        format!("Event: {}", heading.event),
        format!("Competition: {}", heading.competition),
    ] {
        let line = truncate(&line, Font::Regular, HEADING_SIZE, text_room(width));
        surface.cell(Rect::new(x, y, width, HEADING_HEIGHT), &line, Align::Left, false);
        y += HEADING_HEIGHT;
    }

    let rule = y + HEADING_GAP / 2.0;
    surface.line((x, rule), (x + width, rule));
    y + HEADING_GAP
}

/// Header row at `y`; returns the y below it
fn paint_header<S: Surface>(surface: &mut S, layout: &TableLayout, y: f64) -> f64 {
    surface.set_font(Font::Bold, layout.header_font);
    let line_height = (layout.header_height - 2.0 * CELL_PADDING)
        / layout
            .header_lines
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(1) as f64;

    let mut x = layout.margin;
    for (column, lines) in layout.columns.iter().zip(&layout.header_lines) {
        surface.cell(
            Rect::new(x, y, column.width, layout.header_height),
            "",
            Align::Center,
            true,
        );
        // Center the block of lines vertically
        let block = line_height * lines.len() as f64;
        let mut line_y = y + (layout.header_height - block) / 2.0;
        for line in lines {
            surface.cell(
                Rect::new(x, line_y, column.width, line_height),
                line,
                Align::Center,
                false,
            );
            line_y += line_height;
        }
        x += column.width;
    }

    y + layout.header_height
}

fn paint_row<S: Surface>(
    surface: &mut S,
    layout: &TableLayout,
    y: f64,
    rank: usize,
    row: &ResultRow,
    fields: &[CriterionField],
) {
    let mut x = layout.margin;
    for column in &layout.columns {
        let text = cell_text(column.kind, rank, row, fields);
        let text = truncate(&text, Font::Regular, layout.body_font, column.text_room());
        surface.cell(
            Rect::new(x, y, column.width, layout.row_height),
            &text,
            column.align,
            true,
        );
        x += column.width;
    }
}

/// Paint heading, header and one row per result; the header repeats on every
/// page the surface breaks to.
pub fn paint<S: Surface>(
    surface: &mut S,
    layout: &TableLayout,
    heading: &Heading,
    rows: &[ResultRow],
    fields: &[CriterionField],
) {
    surface.add_page(layout.orientation);
    let top = paint_heading(surface, layout, heading);
    let mut y = paint_header(surface, layout, top);

    surface.set_font(Font::Regular, layout.body_font);
    for (index, row) in rows.iter().enumerate() {
        if let Some(next) = surface.break_page(y, layout.row_height) {
            y = paint_header(surface, layout, next);
            surface.set_font(Font::Regular, layout.body_font);
        }
        paint_row(surface, layout, y, index + 1, row, fields);
        y += layout.row_height;
    }

    if rows.is_empty() {
        surface.set_font(Font::Regular, layout.body_font);
        let note = "No results yet";
        surface.cell(
            Rect::new(
                layout.margin,
                y + layout.body_font * MM_PER_PT,
                layout.table_width(),
                layout.row_height,
            ),
            note,
            Align::Left,
            false,
        );
    }
}
