//! Results report: adaptive table layout painted onto a paginated surface
//!
//! Planning ([`layout`]) fixes orientation, column widths, font sizes and
//! header lines once per report. Painting ([`paint`]) then walks the ranked
//! rows; page breaks are left to the [`Surface`].

pub mod layout;
pub mod metrics;
pub mod paint;
pub mod pdf;
pub mod surface;

use crate::aggregate::ResultRow;
use crate::config::ReportConfig;
use crate::model::CriterionField;

pub use layout::{plan_table, TableLayout};
pub use paint::Heading;
pub use pdf::PdfSurface;
pub use surface::{Align, Orientation, Rect, Surface};

/// Lay out and paint a report onto any surface
pub fn render_to<S: Surface>(
    surface: &mut S,
    config: &ReportConfig,
    heading: &Heading,
    rows: &[ResultRow],
    fields: &[CriterionField],
) -> TableLayout {
    let layout = plan_table(config, fields, rows.len());
    tracing::debug!(
        orientation = ?layout.orientation,
        body_font = layout.body_font,
        header_font = layout.header_font,
        columns = layout.columns.len(),
        rows = rows.len(),
        "report layout planned"
    );
    paint::paint(surface, &layout, heading, rows, fields);
    layout
}

/// Render a report as PDF bytes
pub fn render_report(
    config: &ReportConfig,
    heading: &Heading,
    rows: &[ResultRow],
    fields: &[CriterionField],
) -> Vec<u8> {
    let mut surface = PdfSurface::new(config.margin);
    render_to(&mut surface, config, heading, rows, fields);
    surface.finish()
}

#[cfg(test)]
mod tests;
