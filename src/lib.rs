// Expense Recap - Core Library
// Text lines of a travel-expense report → grouped records → xlsx / pdf

pub mod amount;
pub mod classifier;
pub mod config;
pub mod currency;
pub mod export;
pub mod grouping;
pub mod layout;
pub mod model;
pub mod projector;

// Re-export commonly used types
pub use amount::extract_amount;
pub use classifier::{KeywordClassifier, LineClassifier, LineKind};
pub use config::ClassifierConfig;
pub use currency::{format_amount, format_currency};
pub use export::{
    artifact_file_name, write_atomic, write_csv, write_paginated_table, write_spreadsheet,
    DocumentStyle, SheetStyle, TableView,
};
pub use grouping::{group, group_with, GroupingEngine};
pub use layout::{grand_total, group_spans, row_positions, GroupSpan, RowPosition, Summary};
pub use model::{DocumentResult, ExpenseEntry, ExportRow, PersonGroup};
pub use projector::{project, regroup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Split extracted text into the non-blank lines the pipeline consumes
pub fn text_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}
