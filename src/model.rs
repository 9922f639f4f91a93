// 📒 Data Model - Expense entries, person groups, flat export rows
// Built once per pass by the grouping engine, read-only afterwards

use serde::{Deserialize, Serialize};

// ============================================================================
// EXPENSE ENTRY
// ============================================================================

/// One line item belonging to a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Line text with the title marker removed
    pub description: String,

    /// Integer amount in the smallest unit the source text implies
    pub amount: u64,

    /// POH (location code). Reserved, always empty for now
    #[serde(default)]
    pub location_code: String,

    /// Receipt date. Reserved, always empty for now
    #[serde(default)]
    pub receipt_date: String,
}

impl ExpenseEntry {
    pub fn new(description: String, amount: u64) -> Self {
        ExpenseEntry {
            description,
            amount,
            location_code: String::new(),
            receipt_date: String::new(),
        }
    }
}

// ============================================================================
// PERSON GROUP
// ============================================================================

/// All entries for one distinct name, in first-seen order
///
/// Entries are private so the subtotal can only be read through
/// [`PersonGroup::subtotal`], which always sums the current entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonGroup {
    /// 1-based, assigned on first appearance of the name
    pub sequence: u32,

    /// Exact trimmed line text that opened the group
    pub name: String,

    entries: Vec<ExpenseEntry>,
}

impl PersonGroup {
    pub fn new(sequence: u32, name: String) -> Self {
        PersonGroup {
            sequence,
            name,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ExpenseEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ExpenseEntry] {
        &self.entries
    }

    /// Saturates at `u64::MAX` instead of wrapping
    pub fn subtotal(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| entry.amount)
            .fold(0, u64::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// DOCUMENT RESULT
// ============================================================================

/// Whole outcome of one parse pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub title: String,
    pub groups: Vec<PersonGroup>,
}

impl DocumentResult {
    /// Total number of entries across all groups
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries().len()).sum()
    }

    pub fn grand_total(&self) -> u64 {
        self.groups
            .iter()
            .map(PersonGroup::subtotal)
            .fold(0, u64::saturating_add)
    }

    pub fn group(&self, name: &str) -> Option<&PersonGroup> {
        self.groups.iter().find(|group| group.name == name)
    }
}

// ============================================================================
// FLAT EXPORT ROW
// ============================================================================

/// One row per entry, carrying the owning group's fields
///
/// Serialized names follow the table headers of the source documents so the
/// JSON hand-off reads the same as the exported sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "no")]
    pub sequence: u32,

    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "poh")]
    pub location_code: String,

    #[serde(rename = "notaDate")]
    pub receipt_date: String,

    #[serde(rename = "description")]
    pub description: String,

    #[serde(rename = "nominal")]
    pub amount: u64,

    /// Group subtotal, repeated on every row of the group
    #[serde(rename = "total")]
    pub subtotal: u64,
}

impl ExportRow {
    /// Identity of the owning group
    pub fn group_key(&self) -> (u32, &str) {
        (self.sequence, self.name.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal_follows_entries() {
        let mut group = PersonGroup::new(1, "Andi".to_string());
        assert_eq!(group.subtotal(), 0);
        assert!(group.is_empty());

        group.push(ExpenseEntry::new("Tiket pesawat".to_string(), 500_000));
        group.push(ExpenseEntry::new("Penginapan".to_string(), 750_000));

        assert_eq!(group.subtotal(), 1_250_000);
        assert_eq!(group.entries().len(), 2);
    }

    #[test]
    fn test_subtotal_saturates() {
        let mut group = PersonGroup::new(1, "Andi".to_string());
        group.push(ExpenseEntry::new("Tiket".to_string(), u64::MAX));
        group.push(ExpenseEntry::new("Tiket".to_string(), 1));
        assert_eq!(group.subtotal(), u64::MAX);

        let doc = DocumentResult {
            title: "Hasil".to_string(),
            groups: vec![group.clone(), group],
        };
        assert_eq!(doc.grand_total(), u64::MAX);
    }

    #[test]
    fn test_reserved_fields_are_empty() {
        let entry = ExpenseEntry::new("Tiket".to_string(), 1);
        assert_eq!(entry.location_code, "");
        assert_eq!(entry.receipt_date, "");
    }

    #[test]
    fn test_export_row_json_names() {
        let row = ExportRow {
            sequence: 1,
            name: "Andi".to_string(),
            location_code: String::new(),
            receipt_date: String::new(),
            description: "Tiket".to_string(),
            amount: 10,
            subtotal: 10,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["no"], 1);
        assert_eq!(json["poh"], "");
        assert_eq!(json["notaDate"], "");
        assert_eq!(json["nominal"], 10);
        assert_eq!(json["total"], 10);
    }
}
