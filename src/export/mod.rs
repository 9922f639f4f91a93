// 📦 Exporters - Flat rows → spreadsheet, paginated document, JSON/CSV
//
// The spreadsheet keeps subtotals and the grand total as formulas so the
// sheet recomputes after hand edits; the document has no computation model
// and gets literal, pre-formatted values. The two paths stay separate.

pub mod artifact;
pub mod document;
pub mod flat;
pub mod spreadsheet;

pub use artifact::{artifact_file_name, write_atomic};
pub use document::{write_paginated_table, DocumentStyle};
pub use flat::{write_csv, TableView};
pub use spreadsheet::{sanitize_sheet_name, write_spreadsheet, SheetPlan, SheetStyle};

/// Column headers shared by every output surface
pub const HEADERS: [&str; 7] = [
    "No",
    "Nama",
    "POH",
    "Tanggal Nota",
    "Deskripsi",
    "Nominal",
    "Total",
];

pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// Column indexes into [`HEADERS`]
pub const COL_NUMBER: usize = 0;
pub const COL_NAME: usize = 1;
pub const COL_LOCATION: usize = 2;
pub const COL_RECEIPT_DATE: usize = 3;
pub const COL_DESCRIPTION: usize = 4;
pub const COL_AMOUNT: usize = 5;
pub const COL_TOTAL: usize = 6;

pub const SPREADSHEET_EXTENSION: &str = "xlsx";
pub const DOCUMENT_EXTENSION: &str = "pdf";
pub const CSV_EXTENSION: &str = "csv";
pub const JSON_EXTENSION: &str = "json";
