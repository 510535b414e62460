use std::collections::BTreeMap;

use super::layout::{text_room, ColumnKind, NAME_LABEL, RANK_LABEL, TOTAL_LABEL};
use super::metrics::{encode_char, Font, ELLIPSIS};
use super::*;
use crate::model::{ContestantId, CriterionId};

#[derive(Debug, Clone)]
struct TextOp {
    page: usize,
    rect: Rect,
    text: String,
    font: Font,
    size: f64,
}

/// Records what the painter draws so it can be checked without parsing PDF
#[derive(Debug, Default)]
struct RecordingSurface {
    margin: f64,
    pages: Vec<Orientation>,
    font: Option<(Font, f64)>,
    texts: Vec<TextOp>,
    lines: usize,
    borders: usize,
}

impl RecordingSurface {
    fn new(margin: f64) -> Self {
        RecordingSurface {
            margin,
            ..Default::default()
        }
    }

    fn texts_on(&self, page: usize) -> Vec<&str> {
        self.texts
            .iter()
            .filter(|t| t.page == page)
            .map(|t| t.text.as_str())
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn add_page(&mut self, orientation: Orientation) {
        self.pages.push(orientation);
    }

    fn set_font(&mut self, font: Font, size_pt: f64) {
        self.font = Some((font, size_pt));
    }

    fn font(&self) -> (Font, f64) {
        self.font.unwrap_or((Font::Regular, 10.0))
    }

    fn cell(&mut self, rect: Rect, text: &str, _align: Align, border: bool) {
        if border {
            self.borders += 1;
        }
        if !text.is_empty() {
            let (font, size) = self.font();
            self.texts.push(TextOp {
                page: self.pages.len(),
                rect,
                text: text.to_string(),
                font,
                size,
            });
        }
    }

    fn line(&mut self, _from: (f64, f64), _to: (f64, f64)) {
        self.lines += 1;
    }

    fn break_page(&mut self, y: f64, height: f64) -> Option<f64> {
        let orientation = *self.pages.last()?;
        if y + height > orientation.page_size().1 - self.margin {
            self.pages.push(orientation);
            Some(self.margin)
        } else {
            None
        }
    }

    fn finish(self) -> Vec<u8> {
        Vec::new()
    }
}

fn field(id: i64, label: &str) -> CriterionField {
    CriterionField {
        id: CriterionId(id),
        label: label.to_string(),
        max_score: 10.0,
    }
}

fn row(id: i64, name: &str, per_criterion: &[(i64, f64, f64)], total: f64) -> ResultRow {
    let mut weighted = BTreeMap::new();
    let mut raw = BTreeMap::new();
    for (criterion, w, r) in per_criterion {
        weighted.insert(CriterionId(*criterion), *w);
        raw.insert(CriterionId(*criterion), *r);
    }
    ResultRow {
        contestant_id: ContestantId(id),
        contestant: name.to_string(),
        total_weighted: total,
        total_raw: raw.values().sum(),
        per_criterion_weighted: weighted,
        per_criterion_raw: raw,
    }
}

fn heading() -> Heading<'static> {
    Heading {
        title: "Spring Festival Results",
        event: "Main Event",
        competition: "Vocal Solo",
    }
}

#[test]
fn test_small_report_single_portrait_page() {
    let config = ReportConfig::default();
    let fields = [field(1, "Pitch (60%)"), field(2, "Stage (40%)")];
    let rows = [
        row(1, "Alice", &[(1, 48.0, 8.0), (2, 32.0, 4.0)], 80.0),
        row(2, "Bob", &[(1, 30.0, 5.0), (2, 16.0, 2.0)], 46.0),
    ];

    let mut surface = RecordingSurface::new(config.margin);
    let layout = render_to(&mut surface, &config, &heading(), &rows, &fields);

    assert_eq!(layout.orientation, Orientation::Portrait);
    assert_eq!(surface.pages, vec![Orientation::Portrait]);
    assert_eq!(surface.lines, 1);

    let texts = surface.texts_on(1);
    for expected in [
        "Spring Festival Results",
        "Event: Main Event",
        "Competition: Vocal Solo",
        RANK_LABEL,
        NAME_LABEL,
        TOTAL_LABEL,
        "Pitch (60%)",
        "1",
        "Alice",
        "48.0000(8.0000)",
        "80.00",
        "2",
        "Bob",
        "46.00",
    ] {
        assert!(texts.contains(&expected), "missing {expected:?} in {texts:?}");
    }

    // Header cells plus two rows of five bordered cells
    assert_eq!(surface.borders, 5 * 3);
}

#[test]
fn test_rank_follows_row_order() {
    let config = ReportConfig::default();
    let fields = [field(1, "Overall (100%)")];
    let rows = [
        row(7, "Zed", &[(1, 90.0, 9.0)], 90.0),
        row(3, "Amy", &[(1, 50.0, 5.0)], 50.0),
        row(5, "Kim", &[(1, 50.0, 5.0)], 50.0),
    ];

    let mut surface = RecordingSurface::new(config.margin);
    render_to(&mut surface, &config, &heading(), &rows, &fields);

    let texts = surface.texts_on(1);
    let position = |needle: &str| texts.iter().position(|t| *t == needle).unwrap();
    assert!(position("Zed") < position("Amy"));
    assert!(position("Amy") < position("Kim"));
    assert_eq!(texts[position("Zed") - 1], "1");
    assert_eq!(texts[position("Kim") - 1], "3");
}

#[test]
fn test_no_emitted_text_wider_than_its_cell() {
    let config = ReportConfig::default();
    let fields: Vec<CriterionField> = (1..=9)
        .map(|i| {
            field(
                i,
                &format!("Criterion Number {i} With A Rather Long Descriptive Name (11.1%)"),
            )
        })
        .collect();
    let rows: Vec<ResultRow> = (1..=30)
        .map(|i| {
            let per: Vec<(i64, f64, f64)> = (1..=9).map(|c| (c, 11.1111, 9.8765)).collect();
            row(
                i,
                &format!("Contestant With An Exceptionally Long Stage Name Number {i}"),
                &per,
                99.9999,
            )
        })
        .collect();

    let mut surface = RecordingSurface::new(config.margin);
    let layout = render_to(&mut surface, &config, &heading(), &rows, &fields);
    assert_eq!(layout.orientation, Orientation::Landscape);

    for op in &surface.texts {
        let width = op.font.text_width(&op.text, op.size);
        assert!(
            width <= text_room(op.rect.w) + 1e-9,
            "{:?} is {width}mm wide in a {}mm cell",
            op.text,
            op.rect.w
        );
    }
    assert!(surface.texts.iter().any(|t| t.text.ends_with(ELLIPSIS)));
}

#[test]
fn test_non_latin_names_fit_their_cells() {
    let config = ReportConfig::default();
    let fields = [
        field(1, "Æsthetik (40%)"),
        field(2, "评分标准评分标准评分标准 (30%)"),
        field(3, "Présence scénique (30%)"),
    ];
    let names = [
        "Zoë Ångström",
        "Ðorđe Šćepanović-Wœlfflin",
        "山田太郎山田太郎山田太郎山田太郎山田太郎山田太郎山田太郎",
        "ÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆÆ",
    ];
    let rows: Vec<ResultRow> = names
        .iter()
        .zip(1..)
        .map(|(name, id)| {
            let per = [(1, 30.0, 7.5), (2, 20.0, 6.6667), (3, 25.0, 8.3333)];
            row(id, name, &per, 75.0)
        })
        .collect();

    let mut surface = RecordingSurface::new(config.margin);
    render_to(&mut surface, &config, &heading(), &rows, &fields);

    for op in &surface.texts {
        let printed: u32 = op
            .text
            .chars()
            .map(|c| u32::from(op.font.char_width(char::from(encode_char(c)))))
            .sum();
        let measured: u32 = op
            .text
            .chars()
            .map(|c| u32::from(op.font.char_width(c)))
            .sum();
        assert_eq!(measured, printed, "{:?}", op.text);

        let width = op.font.text_width(&op.text, op.size);
        assert!(
            width <= text_room(op.rect.w) + 1e-9,
            "{:?} is {width}mm wide in a {}mm cell",
            op.text,
            op.rect.w
        );
    }
    assert!(surface
        .texts
        .iter()
        .any(|t| t.text.starts_with("ÆÆÆ") && t.text.ends_with(ELLIPSIS)));
    assert!(surface.texts.iter().any(|t| t.text == "Zoë Ångström"));
}

#[test]
fn test_long_report_breaks_pages_and_repeats_header() {
    let config = ReportConfig::default();
    let fields = [field(1, "Overall (100%)")];
    let rows: Vec<ResultRow> = (1..=120)
        .map(|i| row(i, &format!("Contestant {i}"), &[(1, 50.0, 5.0)], 50.0))
        .collect();

    let mut surface = RecordingSurface::new(config.margin);
    let layout = render_to(&mut surface, &config, &heading(), &rows, &fields);

    assert_eq!(layout.orientation, Orientation::Landscape);
    assert!(surface.pages.len() > 1);
    assert!(surface.pages.iter().all(|o| *o == Orientation::Landscape));

    for page in 1..=surface.pages.len() {
        let texts = surface.texts_on(page);
        assert!(texts.contains(&NAME_LABEL), "page {page} lacks a header");
    }
    // Heading only once
    let titles = surface
        .texts
        .iter()
        .filter(|t| t.text == "Spring Festival Results")
        .count();
    assert_eq!(titles, 1);
    assert!(surface.texts.iter().any(|t| t.text == "Contestant 120"));
}

#[test]
fn test_empty_results_still_render() {
    let config = ReportConfig::default();
    let fields = [field(1, "Overall (100%)")];

    let mut surface = RecordingSurface::new(config.margin);
    render_to(&mut surface, &config, &heading(), &[], &fields);
    assert_eq!(surface.pages.len(), 1);
    assert!(surface.texts_on(1).contains(&"No results yet"));
}

#[test]
fn test_render_report_produces_pdf() {
    let config = ReportConfig::default();
    let fields = [field(1, "Pitch (60%)"), field(2, "Stage (40%)")];
    let rows = [row(1, "Alice", &[(1, 48.0, 8.0), (2, 32.0, 4.0)], 80.0)];

    let bytes = render_report(&config, &heading(), &rows, &fields);
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    let needle = b"(48.0000\\(8.0000\\)) Tj";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn test_header_columns_match_criteria_order() {
    let config = ReportConfig::default();
    let fields = [field(9, "Zeta (50%)"), field(2, "Alpha (50%)")];
    let layout = plan_table(&config, &fields, 1);

    assert_eq!(layout.columns[2].kind, ColumnKind::Criterion(0));
    assert_eq!(layout.columns[2].label, "Zeta (50%)");
    assert_eq!(layout.columns[3].label, "Alpha (50%)");
}
