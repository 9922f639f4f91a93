// 📤 Export Projector - Groups → flat rows
// One row per entry, group fields duplicated on every row

use crate::model::{DocumentResult, ExpenseEntry, ExportRow, PersonGroup};

/// Flatten a document into presentation-ready rows.
///
/// Groups without entries produce no rows.
pub fn project(doc: &DocumentResult) -> Vec<ExportRow> {
    doc.groups
        .iter()
        .flat_map(|group| {
            let subtotal = group.subtotal();
            group.entries().iter().map(move |entry| ExportRow {
                sequence: group.sequence,
                name: group.name.clone(),
                location_code: entry.location_code.clone(),
                receipt_date: entry.receipt_date.clone(),
                description: entry.description.clone(),
                amount: entry.amount,
                subtotal,
            })
        })
        .collect()
}

/// Rebuild groups from flat rows, keyed by `(sequence, name)` in first-seen order
pub fn regroup(rows: &[ExportRow]) -> Vec<PersonGroup> {
    let mut groups: Vec<PersonGroup> = Vec::new();

    for row in rows {
        let position = match groups
            .iter()
            .position(|g| (g.sequence, g.name.as_str()) == row.group_key())
        {
            Some(position) => position,
            None => {
                groups.push(PersonGroup::new(row.sequence, row.name.clone()));
                groups.len() - 1
            }
        };

        groups[position].push(ExpenseEntry {
            description: row.description.clone(),
            amount: row.amount,
            location_code: row.location_code.clone(),
            receipt_date: row.receipt_date.clone(),
        });
    }

    groups
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group;

    #[test]
    fn test_rows_carry_group_fields() {
        let doc = group([
            "Andi",
            "Tiket pesawat 500.000",
            "Penginapan hotel 750000",
            "Budi",
            "Tiket 300.000",
        ]);
        let rows = project(&doc);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].group_key(), (1, "Andi"));
        assert_eq!(rows[1].group_key(), (1, "Andi"));
        assert_eq!(rows[0].subtotal, 1_250_000);
        assert_eq!(rows[1].subtotal, 1_250_000);
        assert_eq!(rows[2].group_key(), (2, "Budi"));
        assert_eq!(rows[2].subtotal, 300_000);
        assert_eq!(rows[2].location_code, "");
        assert_eq!(rows[2].receipt_date, "");
    }

    #[test]
    fn test_empty_group_has_no_rows() {
        let doc = group(["Andi", "Budi", "Tiket 100"]);
        let rows = project(&doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_key(), (2, "Budi"));
    }

    #[test]
    fn test_regroup_round_trip() {
        let doc = group([
            "Citra",
            "Tiket 5",
            "Andi",
            "Tiket 6",
            "Penginapan 7",
            "Citra",
            "info 8",
        ]);

        let regrouped = regroup(&project(&doc));
        assert_eq!(regrouped, doc.groups);
    }
}
