// 🧱 Group Layout - Shared "first row of group" rule
//
// Screen table, spreadsheet and document all show Number/Name/Total only on
// the first row of a group and span those cells over the group's rows. Each
// target decides what a blank cell is; the spans are computed here once.

use crate::model::ExportRow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Contiguous run of rows sharing `(sequence, name)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpan {
    /// Index of the first row in the slice
    pub start: usize,
    pub len: usize,
    pub sequence: u32,
    pub name: String,
    pub subtotal: u64,
}

impl GroupSpan {
    /// Index of the last row in the slice
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }

    pub fn is_multi_row(&self) -> bool {
        self.len > 1
    }
}

pub fn group_spans(rows: &[ExportRow]) -> Vec<GroupSpan> {
    let mut spans: Vec<GroupSpan> = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        if let Some(span) = spans.last_mut() {
            if (span.sequence, span.name.as_str()) == row.group_key() {
                span.len += 1;
                continue;
            }
        }

        spans.push(GroupSpan {
            start: i,
            len: 1,
            sequence: row.sequence,
            name: row.name.clone(),
            subtotal: row.subtotal,
        });
    }

    spans
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPosition {
    /// First row of a group spanning `span` rows
    Lead { span: usize },
    Continuation,
}

impl RowPosition {
    pub fn is_lead(&self) -> bool {
        matches!(self, RowPosition::Lead { .. })
    }

    /// Value on a group's first row, the target's blank elsewhere
    pub fn lead_cell<T>(&self, value: impl FnOnce() -> T, blank: T) -> T {
        match self {
            RowPosition::Lead { .. } => value(),
            RowPosition::Continuation => blank,
        }
    }
}

/// Position of every row within its group, index-aligned with `rows`
pub fn row_positions(rows: &[ExportRow]) -> Vec<RowPosition> {
    let mut positions = vec![RowPosition::Continuation; rows.len()];
    for span in group_spans(rows) {
        positions[span.start] = RowPosition::Lead { span: span.len };
    }
    positions
}

/// Sum of one subtotal per distinct group, however many rows it has.
/// Saturates like [`PersonGroup::subtotal`](crate::model::PersonGroup::subtotal).
pub fn grand_total(rows: &[ExportRow]) -> u64 {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.group_key()))
        .map(|row| row.subtotal)
        .fold(0, u64::saturating_add)
}

/// Header figures shown above the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub entries: usize,
    pub people: usize,
    pub grand_total: u64,
}

impl Summary {
    pub fn from_rows(rows: &[ExportRow]) -> Self {
        let people = rows
            .iter()
            .map(ExportRow::group_key)
            .collect::<HashSet<_>>()
            .len();

        Summary {
            entries: rows.len(),
            people,
            grand_total: grand_total(rows),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
