// 📊 Spreadsheet Exporter - Flat rows → styled .xlsx workbook
//
// Layout is planned as plain data first (cells, merges, formulas) and only
// then rendered with rust_xlsxwriter, so the layout rules are testable
// without opening the produced file.

use super::{
    COL_AMOUNT, COL_DESCRIPTION, COL_LOCATION, COL_NAME, COL_NUMBER, COL_RECEIPT_DATE,
    COL_TOTAL, GRAND_TOTAL_LABEL, HEADERS,
};
use crate::layout::{grand_total, group_spans, row_positions, RowPosition};
use crate::model::ExportRow;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Formula, Workbook};

// ============================================================================
// STYLE CONSTANTS
// ============================================================================

pub const MAX_SHEET_NAME_LEN: usize = 31;
pub const INVALID_SHEET_NAME_CHARS: &[char] = &['*', '?', ':', '/', '\\', '[', ']'];
pub const FALLBACK_SHEET_NAME: &str = "Sheet1";

pub const FONT_NAME: &str = "Arial";
pub const HEADER_FILL: u32 = 0x1E40AF;
pub const HEADER_FONT_COLOR: u32 = 0xFFFFFF;
pub const HEADER_FONT_SIZE: f64 = 12.0;
pub const TOTAL_FILL: u32 = 0xDBEAFE;
pub const TOTAL_FONT_COLOR: u32 = 0x1E40AF;
pub const TOTAL_FONT_SIZE: f64 = 11.0;
pub const THIN_BORDER_COLOR: u32 = 0x94A3B8;
pub const THICK_BORDER_COLOR: u32 = 0x1E40AF;
pub const NUMBER_FORMAT: &str = "#,##0.00";
pub const COLUMN_WIDTHS: [f64; 7] = [8.0, 20.0, 15.0, 15.0, 40.0, 15.0, 15.0];

/// Overridable look of the workbook; `Default` uses the constants above
#[derive(Debug, Clone, PartialEq)]
pub struct SheetStyle {
    pub font_name: String,
    pub header_fill: u32,
    pub header_font_color: u32,
    pub header_font_size: f64,
    pub total_fill: u32,
    pub total_font_color: u32,
    pub total_font_size: f64,
    pub thin_border_color: u32,
    pub thick_border_color: u32,
    pub number_format: String,
    pub column_widths: [f64; 7],
}

impl Default for SheetStyle {
    fn default() -> Self {
        SheetStyle {
            font_name: FONT_NAME.to_string(),
            header_fill: HEADER_FILL,
            header_font_color: HEADER_FONT_COLOR,
            header_font_size: HEADER_FONT_SIZE,
            total_fill: TOTAL_FILL,
            total_font_color: TOTAL_FONT_COLOR,
            total_font_size: TOTAL_FONT_SIZE,
            thin_border_color: THIN_BORDER_COLOR,
            thick_border_color: THICK_BORDER_COLOR,
            number_format: NUMBER_FORMAT.to_string(),
            column_widths: COLUMN_WIDTHS,
        }
    }
}

// ============================================================================
// SHEET PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Formula with the value it evaluates to, cached for viewers that
    /// do not recalculate on open
    Formula { formula: String, result: u64 },
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Header,
    Body { numeric: bool },
    GrandTotal { numeric: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    /// Zero-based sheet row (row 0 is the header)
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub role: CellRole,
    pub align: CellAlign,
}

/// Vertical merge over one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    pub first_row: u32,
    pub last_row: u32,
    pub col: u16,
}

impl MergeRegion {
    fn covers(&self, row: u32, col: u16) -> bool {
        col == self.col && row >= self.first_row && row <= self.last_row
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub sheet_name: String,
    pub cells: Vec<PlannedCell>,
    pub merges: Vec<MergeRegion>,
}

impl SheetPlan {
    pub fn cell(&self, row: u32, col: u16) -> Option<&PlannedCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    pub fn formulas(&self) -> impl Iterator<Item = &PlannedCell> {
        self.cells
            .iter()
            .filter(|c| matches!(c.value, CellValue::Formula { .. }))
    }

    /// Zero-based row of the grand total
    pub fn grand_total_row(&self) -> u32 {
        self.cells.iter().map(|c| c.row).max().unwrap_or(0)
    }
}

/// Strip characters Excel refuses in sheet names and cap the length
pub fn sanitize_sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !INVALID_SHEET_NAME_CHARS.contains(c))
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    // Excel also rejects names that start or end with an apostrophe
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.trim().is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn body_align(col: usize) -> CellAlign {
    match col {
        COL_DESCRIPTION => CellAlign::Left,
        COL_AMOUNT | COL_TOTAL => CellAlign::Right,
        _ => CellAlign::Center,
    }
}

fn total_align(col: usize) -> CellAlign {
    match col {
        COL_DESCRIPTION | COL_TOTAL => CellAlign::Right,
        _ => CellAlign::Center,
    }
}

fn is_numeric(col: usize) -> bool {
    col == COL_AMOUNT || col == COL_TOTAL
}

/// A1-style row number of zero-based sheet row `row`
fn excel_row(row: u32) -> u32 {
    row + 1
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

/// Lay out header, grouped data rows and the grand total row
pub fn plan_sheet(rows: &[ExportRow], title: &str) -> SheetPlan {
    let mut cells = Vec::with_capacity((rows.len() + 2) * HEADERS.len());
    let mut merges = Vec::new();

    for (col, label) in HEADERS.iter().enumerate() {
        cells.push(PlannedCell {
            row: 0,
            col: col as u16,
            value: CellValue::Text(label.to_string()),
            role: CellRole::Header,
            align: CellAlign::Center,
        });
    }

    // Data row i sits on sheet row i + 1
    let sheet_row = |i: usize| (i + 1) as u32;
    let positions = row_positions(rows);
    let spans = group_spans(rows);
    let amount_col = column_letter(COL_AMOUNT);

    for (i, (row, position)) in rows.iter().zip(&positions).enumerate() {
        let r = sheet_row(i);
        let total = match position {
            RowPosition::Lead { span } => {
                let first = excel_row(r);
                let last = excel_row(r + *span as u32 - 1);
                CellValue::Formula {
                    formula: format!("=SUM({c}{}:{c}{})", first, last, c = amount_col),
                    result: row.subtotal,
                }
            }
            RowPosition::Continuation => CellValue::Blank,
        };

        let values = [
            (COL_NUMBER, position.lead_cell(|| CellValue::Number(row.sequence as f64), CellValue::Blank)),
            (COL_NAME, position.lead_cell(|| CellValue::Text(row.name.clone()), CellValue::Blank)),
            (COL_LOCATION, CellValue::Text(row.location_code.clone())),
            (COL_RECEIPT_DATE, CellValue::Text(row.receipt_date.clone())),
            (COL_DESCRIPTION, CellValue::Text(row.description.clone())),
            (COL_AMOUNT, CellValue::Number(row.amount as f64)),
            (COL_TOTAL, total),
        ];

        for (col, value) in values {
            cells.push(PlannedCell {
                row: r,
                col: col as u16,
                value,
                role: CellRole::Body {
                    numeric: is_numeric(col),
                },
                align: body_align(col),
            });
        }
    }

    for span in spans.iter().filter(|span| span.is_multi_row()) {
        for col in [COL_NUMBER, COL_NAME] {
            merges.push(MergeRegion {
                first_row: sheet_row(span.start),
                last_row: sheet_row(span.end()),
                col: col as u16,
            });
        }
    }

    let total_row = sheet_row(rows.len());
    let total_col = column_letter(COL_TOTAL);
    for col in 0..HEADERS.len() {
        let value = match col {
            COL_DESCRIPTION => CellValue::Text(GRAND_TOTAL_LABEL.to_string()),
            COL_TOTAL => CellValue::Formula {
                formula: format!("=SUM({c}2:{c}{})", excel_row(total_row - 1), c = total_col),
                result: grand_total(rows),
            },
            _ => CellValue::Blank,
        };
        cells.push(PlannedCell {
            row: total_row,
            col: col as u16,
            value,
            role: CellRole::GrandTotal {
                numeric: col == COL_TOTAL,
            },
            align: total_align(col),
        });
    }

    SheetPlan {
        sheet_name: sanitize_sheet_name(title),
        cells,
        merges,
    }
}

// ============================================================================
// RENDERING
// ============================================================================

struct Formats {
    header: Format,
    body: Format,
    total: Format,
}

impl Formats {
    fn new(style: &SheetStyle) -> Self {
        let base = Format::new()
            .set_font_name(style.font_name.as_str())
            .set_align(FormatAlign::VerticalCenter);

        Formats {
            header: base
                .clone()
                .set_bold()
                .set_font_size(style.header_font_size)
                .set_font_color(Color::RGB(style.header_font_color))
                .set_background_color(Color::RGB(style.header_fill))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Medium)
                .set_border_color(Color::RGB(style.thick_border_color)),
            body: base
                .clone()
                .set_border(FormatBorder::Thin)
                .set_border_color(Color::RGB(style.thin_border_color)),
            total: base
                .set_bold()
                .set_font_size(style.total_font_size)
                .set_font_color(Color::RGB(style.total_font_color))
                .set_background_color(Color::RGB(style.total_fill))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Medium)
                .set_border_color(Color::RGB(style.thick_border_color)),
        }
    }

    fn for_cell(&self, cell: &PlannedCell, style: &SheetStyle) -> Format {
        let (format, numeric) = match cell.role {
            CellRole::Header => (self.header.clone(), false),
            CellRole::Body { numeric } => (self.body.clone(), numeric),
            CellRole::GrandTotal { numeric } => (self.total.clone(), numeric),
        };

        let format = match cell.align {
            CellAlign::Left => format.set_align(FormatAlign::Left),
            CellAlign::Center => format.set_align(FormatAlign::Center),
            CellAlign::Right => format.set_align(FormatAlign::Right),
        };

        if numeric {
            format.set_num_format(style.number_format.as_str())
        } else {
            format
        }
    }
}

/// Render a planned sheet into a complete in-memory workbook
pub fn render_plan(plan: &SheetPlan, style: &SheetStyle) -> Result<Vec<u8>> {
    let formats = Formats::new(style);
    let mut workbook = Workbook::new();

    {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(plan.sheet_name.as_str())
            .with_context(|| format!("Invalid sheet name: {:?}", plan.sheet_name))?;

        for (col, width) in style.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        for merge in &plan.merges {
            let format = plan
                .cell(merge.first_row, merge.col)
                .map(|cell| formats.for_cell(cell, style))
                .unwrap_or_else(|| formats.body.clone());
            worksheet
                .merge_range(merge.first_row, merge.col, merge.last_row, merge.col, "", &format)
                .with_context(|| {
                    format!(
                        "Failed to merge rows {}-{} in column {}",
                        merge.first_row, merge.last_row, merge.col
                    )
                })?;
        }

        for cell in &plan.cells {
            // merge_range already wrote the styled blanks under a merge
            let hidden = plan
                .merges
                .iter()
                .any(|m| m.covers(cell.row, cell.col) && cell.row != m.first_row);
            if hidden {
                continue;
            }

            let format = formats.for_cell(cell, style);
            match &cell.value {
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(cell.row, cell.col, text.as_str(), &format)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *number, &format)?;
                }
                CellValue::Formula { formula, result } => {
                    let formula = Formula::new(formula.as_str()).set_result(result.to_string());
                    worksheet.write_formula_with_format(cell.row, cell.col, formula, &format)?;
                }
                CellValue::Blank => {
                    worksheet.write_blank(cell.row, cell.col, &format)?;
                }
            }
        }
    }

    workbook
        .save_to_buffer()
        .context("Failed to serialize spreadsheet")
}

/// Build the complete `.xlsx` artifact for `rows`
pub fn write_spreadsheet(rows: &[ExportRow], title: &str, style: &SheetStyle) -> Result<Vec<u8>> {
    let plan = plan_sheet(rows, title);
    tracing::debug!(
        "Spreadsheet plan: {} cells, {} merges, sheet {:?}",
        plan.cells.len(),
        plan.merges.len(),
        plan.sheet_name
    );
    render_plan(&plan, style)
}

// ============================================================================
// TESTS
// ============================================================================
