// 📄 Document Exporter - Flat rows → paginated PDF table
//
// Values are literal strings (no formulas). Rows are measured, paginated so
// no row splits across pages, and the header row is redrawn on every page.

use super::{COL_AMOUNT, COL_DESCRIPTION, COL_TOTAL, GRAND_TOTAL_LABEL, HEADERS};
use crate::currency::format_amount;
use crate::layout::{grand_total, row_positions};
use crate::model::ExportRow;
use anyhow::{anyhow, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Point, Polygon, Rgb,
};
use std::ops::Range;

// ============================================================================
// STYLE CONSTANTS
// ============================================================================

/// A4 portrait
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 14.0;
pub const TITLE_BASELINE_MM: f32 = 15.0;
pub const TABLE_TOP_MM: f32 = 25.0;
pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const FONT_SIZE: f32 = 8.0;
pub const CELL_PADDING_MM: f32 = 2.0;
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// `None` marks an auto column that takes the remaining width
pub const COLUMN_WIDTHS_MM: [Option<f32>; 7] = [
    Some(15.0),
    Some(30.0),
    Some(20.0),
    Some(25.0),
    None,
    Some(30.0),
    Some(30.0),
];

pub const TEXT_COLOR: [u8; 3] = [20, 20, 20];
pub const HEADER_FILL: [u8; 3] = [75, 85, 99];
pub const HEADER_TEXT_COLOR: [u8; 3] = [255, 255, 255];
pub const STRIPE_FILL: [u8; 3] = [249, 250, 251];
pub const TOTAL_FILL: [u8; 3] = [229, 231, 235];

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Built-in fonts carry no metrics here; bold runs slightly wider
const BOLD_WIDTH_FACTOR: f32 = 1.07;

/// Overridable page geometry and colours; `Default` uses the constants above
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStyle {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub title_baseline_mm: f32,
    pub table_top_mm: f32,
    pub title_font_size: f32,
    pub font_size: f32,
    pub cell_padding_mm: f32,
    pub line_height_factor: f32,
    pub column_widths_mm: [Option<f32>; 7],
    pub text_color: [u8; 3],
    pub header_fill: [u8; 3],
    pub header_text_color: [u8; 3],
    pub stripe_fill: [u8; 3],
    pub total_fill: [u8; 3],
}

impl Default for DocumentStyle {
    fn default() -> Self {
        DocumentStyle {
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            title_baseline_mm: TITLE_BASELINE_MM,
            table_top_mm: TABLE_TOP_MM,
            title_font_size: TITLE_FONT_SIZE,
            font_size: FONT_SIZE,
            cell_padding_mm: CELL_PADDING_MM,
            line_height_factor: LINE_HEIGHT_FACTOR,
            column_widths_mm: COLUMN_WIDTHS_MM,
            text_color: TEXT_COLOR,
            header_fill: HEADER_FILL,
            header_text_color: HEADER_TEXT_COLOR,
            stripe_fill: STRIPE_FILL,
            total_fill: TOTAL_FILL,
        }
    }
}

impl DocumentStyle {
    /// Fixed widths as given, auto columns share what is left of the page
    pub fn resolved_widths(&self) -> [f32; 7] {
        let available = self.page_width_mm - 2.0 * self.margin_mm;
        let fixed: f32 = self.column_widths_mm.iter().flatten().sum();
        let autos = self.column_widths_mm.iter().filter(|w| w.is_none()).count();
        let min_width = 2.0 * self.cell_padding_mm + 1.0;
        let auto_width = if autos == 0 {
            0.0
        } else {
            ((available - fixed) / autos as f32).max(min_width)
        };

        self.column_widths_mm.map(|w| w.unwrap_or(auto_width))
    }

    fn line_height_mm(&self) -> f32 {
        self.font_size * PT_TO_MM * self.line_height_factor
    }

    fn row_height_mm(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.line_height_mm() + 2.0 * self.cell_padding_mm
    }

    fn bottom_limit_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }
}

// ============================================================================
// TABLE CONTENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Body,
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: [String; 7],
    pub kind: RowKind,
}

/// Body rows with literal values, then the grand total row
pub fn table_rows(rows: &[ExportRow]) -> Vec<TableRow> {
    let mut table: Vec<TableRow> = rows
        .iter()
        .zip(row_positions(rows))
        .map(|(row, position)| TableRow {
            cells: [
                position.lead_cell(|| row.sequence.to_string(), String::new()),
                position.lead_cell(|| row.name.clone(), String::new()),
                row.location_code.clone(),
                row.receipt_date.clone(),
                row.description.clone(),
                format_amount(row.amount),
                position.lead_cell(|| format_amount(row.subtotal), String::new()),
            ],
            kind: RowKind::Body,
        })
        .collect();

    let mut total_cells: [String; 7] = Default::default();
    total_cells[COL_DESCRIPTION] = GRAND_TOTAL_LABEL.to_string();
    total_cells[COL_TOTAL] = format_amount(grand_total(rows));
    table.push(TableRow {
        cells: total_cells,
        kind: RowKind::GrandTotal,
    });

    table
}

// ============================================================================
// TEXT MEASUREMENT
// ============================================================================

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];
const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

pub fn text_width_mm(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    let width = units as f32 / 1000.0 * font_size * PT_TO_MM;
    if bold {
        width * BOLD_WIDTH_FACTOR
    } else {
        width
    }
}

/// Greedy word wrap; words longer than the line are broken by character.
/// Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size: f32, bold: bool) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, font_size, bold) <= max_width_mm;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if fits(word) {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Split rows into pages so none crosses the bottom limit.
///
/// Every page starts with the header; a row taller than a whole page still
/// gets a page to itself rather than being dropped.
pub fn paginate(
    row_heights: &[f32],
    header_height: f32,
    first_page_top: f32,
    next_page_top: f32,
    bottom_limit: f32,
) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut y = first_page_top + header_height;

    for (i, height) in row_heights.iter().enumerate() {
        if y + height > bottom_limit && i > start {
            pages.push(start..i);
            start = i;
            y = next_page_top + header_height;
        }
        y += height;
    }

    if start < row_heights.len() || pages.is_empty() {
        pages.push(start..row_heights.len());
    }
    pages
}

// ============================================================================
// RENDERING
// ============================================================================

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        None,
    ))
}

/// Draws in top-down millimetres on one page
struct Painter<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    page_height: f32,
}

impl<'a> Painter<'a> {
    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, color: [u8; 3]) {
        let y_top = self.page_height - top;
        let y_bottom = y_top - height;
        let corners = [
            (x, y_bottom),
            (x + width, y_bottom),
            (x + width, y_top),
            (x, y_top),
        ];

        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![corners
                .iter()
                .map(|&(px, py)| (Point::new(Mm(px), Mm(py)), false))
                .collect()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn text(&self, text: &str, x: f32, baseline: f32, size: f32, bold: bool, color: [u8; 3]) {
        if text.is_empty() {
            return;
        }
        let font = if bold { self.bold } else { self.regular };
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(text, size, Mm(x), Mm(self.page_height - baseline), font);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

struct MeasuredRow {
    lines: Vec<Vec<String>>,
    height: f32,
    kind: RowKind,
    striped: bool,
    bold: bool,
}

fn measure(cells: &[String; 7], widths: &[f32; 7], style: &DocumentStyle, bold: bool) -> Vec<Vec<String>> {
    cells
        .iter()
        .zip(widths)
        .map(|(text, width)| {
            wrap_text(
                text,
                width - 2.0 * style.cell_padding_mm,
                style.font_size,
                bold,
            )
        })
        .collect()
}

fn draw_row(
    painter: &Painter,
    row: &MeasuredRow,
    top: f32,
    widths: &[f32; 7],
    style: &DocumentStyle,
    fill: Option<[u8; 3]>,
    text_color: [u8; 3],
    align_for: impl Fn(usize) -> Align,
) {
    let table_width: f32 = widths.iter().sum();
    if let Some(fill) = fill {
        painter.fill_rect(style.margin_mm, top, table_width, row.height, fill);
    }

    let font_mm = style.font_size * PT_TO_MM;
    let line_height = style.line_height_mm();
    let mut x = style.margin_mm;

    for (col, (lines, width)) in row.lines.iter().zip(widths).enumerate() {
        for (k, line) in lines.iter().enumerate() {
            let baseline = top + style.cell_padding_mm + font_mm * 0.8 + k as f32 * line_height;
            let text_width = text_width_mm(line, style.font_size, row.bold);
            let text_x = match align_for(col) {
                Align::Left => x + style.cell_padding_mm,
                Align::Center => x + (width - text_width) / 2.0,
                Align::Right => x + width - style.cell_padding_mm - text_width,
            };
            painter.text(line, text_x, baseline, style.font_size, row.bold, text_color);
        }
        x += width;
    }
}

fn body_align(col: usize) -> Align {
    if col == COL_AMOUNT || col == COL_TOTAL {
        Align::Right
    } else {
        Align::Left
    }
}

/// Build the complete PDF artifact for `rows`
pub fn write_paginated_table(rows: &[ExportRow], title: &str, style: &DocumentStyle) -> Result<Vec<u8>> {
    let widths = style.resolved_widths();

    let header_cells: [String; 7] = HEADERS.map(str::to_string);
    let header_lines = measure(&header_cells, &widths, style, true);
    let header = MeasuredRow {
        height: style.row_height_mm(header_lines.iter().map(Vec::len).max().unwrap_or(1)),
        lines: header_lines,
        kind: RowKind::Body,
        striped: false,
        bold: true,
    };

    let body: Vec<MeasuredRow> = table_rows(rows)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let bold = row.kind == RowKind::GrandTotal;
            let lines = measure(&row.cells, &widths, style, bold);
            let height = style.row_height_mm(lines.iter().map(Vec::len).max().unwrap_or(1));
            MeasuredRow {
                lines,
                height,
                kind: row.kind,
                striped: i % 2 == 1,
                bold,
            }
        })
        .collect();

    let heights: Vec<f32> = body.iter().map(|row| row.height).collect();
    let pages = paginate(
        &heights,
        header.height,
        style.table_top_mm,
        style.margin_mm,
        style.bottom_limit_mm(),
    );

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(style.page_width_mm),
        Mm(style.page_height_mm),
        "Table",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| anyhow!("Failed to load PDF font: {:?}", err))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| anyhow!("Failed to load PDF font: {:?}", err))?;

    for (page_index, range) in pages.iter().enumerate() {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) =
                doc.add_page(Mm(style.page_width_mm), Mm(style.page_height_mm), "Table");
            doc.get_page(page).get_layer(layer)
        };
        let painter = Painter {
            layer,
            regular: &regular,
            bold: &bold,
            page_height: style.page_height_mm,
        };

        let mut top = if page_index == 0 {
            painter.text(
                title,
                style.margin_mm,
                style.title_baseline_mm,
                style.title_font_size,
                true,
                style.text_color,
            );
            style.table_top_mm
        } else {
            style.margin_mm
        };

        draw_row(
            &painter,
            &header,
            top,
            &widths,
            style,
            Some(style.header_fill),
            style.header_text_color,
            |_| Align::Center,
        );
        top += header.height;

        for row in &body[range.clone()] {
            let fill = match row.kind {
                RowKind::GrandTotal => Some(style.total_fill),
                RowKind::Body if row.striped => Some(style.stripe_fill),
                RowKind::Body => None,
            };
            draw_row(&painter, row, top, &widths, style, fill, style.text_color, body_align);
            top += row.height;
        }
    }

    tracing::debug!("Document layout: {} row(s) over {} page(s)", body.len(), pages.len());

    doc.save_to_bytes()
        .map_err(|err| anyhow!("Failed to serialize PDF document: {:?}", err))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group;
    use crate::projector::project;

    fn two_group_rows() -> Vec<ExportRow> {
        project(&group([
            "Laporan Perjalanan Dinas",
            "Andi",
            "Tiket pesawat 500.000",
            "Penginapan hotel 750000",
            "Budi",
            "Tiket kereta 100.000",
            "Penginapan 200.000",
        ]))
    }

    #[test]
    fn test_resolved_widths() {
        let widths = DocumentStyle::default().resolved_widths();
        assert_eq!(widths[0], 15.0);
        assert_eq!(widths[4], 210.0 - 28.0 - 150.0);
        assert_eq!(widths.iter().sum::<f32>(), 182.0);
    }

    #[test]
    fn test_table_rows_literal_values() {
        let table = table_rows(&two_group_rows());
        assert_eq!(table.len(), 5);

        assert_eq!(table[0].cells[0], "1");
        assert_eq!(table[0].cells[1], "Andi");
        assert_eq!(table[0].cells[5], "500.000,00");
        assert_eq!(table[0].cells[6], "1.250.000,00");

        assert_eq!(table[1].cells[0], "");
        assert_eq!(table[1].cells[1], "");
        assert_eq!(table[1].cells[6], "");

        assert_eq!(table[2].cells[0], "2");
        assert_eq!(table[2].cells[6], "300.000,00");
    }

    #[test]
    fn test_grand_total_row_once() {
        let table = table_rows(&two_group_rows());
        let totals: Vec<_> = table.iter().filter(|r| r.kind == RowKind::GrandTotal).collect();
        assert_eq!(totals.len(), 1);
        assert_eq!(table.last().unwrap().kind, RowKind::GrandTotal);
        assert_eq!(totals[0].cells[COL_DESCRIPTION], "Grand Total");
        assert_eq!(totals[0].cells[COL_TOTAL], "1.550.000,00");
        assert_eq!(totals[0].cells[COL_AMOUNT], "");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10.0, 8.0, false), vec![String::new()]);
        assert_eq!(wrap_text("Andi", 50.0, 8.0, false), vec!["Andi".to_string()]);

        let lines = wrap_text("Tiket pesawat Jakarta Denpasar pulang pergi", 20.0, 8.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 8.0, false) <= 20.0);
        }
        assert_eq!(lines.join(" "), "Tiket pesawat Jakarta Denpasar pulang pergi");
    }

    #[test]
    fn test_wrap_breaks_long_word() {
        let word = "W".repeat(40);
        let lines = wrap_text(&word, 10.0, 8.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_paginate_single_page() {
        let pages = paginate(&[10.0, 10.0, 10.0], 8.0, 25.0, 14.0, 283.0);
        assert_eq!(pages, vec![0..3]);
    }

    #[test]
    fn test_paginate_breaks_without_splitting_rows() {
        // 25 + 10 header leaves room for 24 rows of 10 before 283
        let heights = vec![10.0; 30];
        let pages = paginate(&heights, 10.0, 25.0, 14.0, 283.0);
        assert_eq!(pages, vec![0..24, 24..30]);
    }

    #[test]
    fn test_paginate_oversized_row() {
        let pages = paginate(&[10.0, 500.0, 10.0], 10.0, 25.0, 14.0, 283.0);
        assert_eq!(pages, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_write_paginated_table_produces_pdf() {
        let bytes =
            write_paginated_table(&two_group_rows(), "Laporan Dinas", &DocumentStyle::default())
                .unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_long_table_spans_pages() {
        let mut lines = vec!["Andi".to_string()];
        lines.extend((0..120).map(|i| format!("Tiket {}.000", i + 1)));
        let rows = project(&group(lines));

        let style = DocumentStyle::default();
        let bytes = write_paginated_table(&rows, "Hasil", &style).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");

        let row_height = style.row_height_mm(1);
        let heights = vec![row_height; rows.len() + 1];
        let pages = paginate(&heights, row_height, style.table_top_mm, style.margin_mm, style.bottom_limit_mm());
        assert!(pages.len() > 1);
    }
}
