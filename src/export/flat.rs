// Flat surfaces: JSON hand-off for the screen table, CSV of the rows

use super::HEADERS;
use crate::layout::Summary;
use crate::model::ExportRow;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Everything an on-screen table needs: title, header figures, rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub title: String,
    pub summary: Summary,
    pub rows: Vec<ExportRow>,
}

impl TableView {
    pub fn new(title: &str, rows: Vec<ExportRow>) -> Self {
        TableView {
            title: title.to_string(),
            summary: Summary::from_rows(&rows),
            rows,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).context("Failed to serialize table view")
    }
}

/// One CSV record per row, group fields repeated, raw integer amounts
pub fn write_csv(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADERS)
        .context("Failed to write CSV header")?;

    for row in rows {
        writer
            .write_record([
                row.sequence.to_string(),
                row.name.clone(),
                row.location_code.clone(),
                row.receipt_date.clone(),
                row.description.clone(),
                row.amount.to_string(),
                row.subtotal.to_string(),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", row.name))?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to flush CSV output: {}", err.error()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group;
    use crate::projector::project;

    fn rows() -> Vec<ExportRow> {
        project(&group([
            "Andi",
            "Tiket pesawat 500.000",
            "Penginapan hotel 750000",
            "Budi",
            "Tiket, kereta 300.000",
        ]))
    }

    #[test]
    fn test_csv_output() {
        let bytes = write_csv(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "No,Nama,POH,Tanggal Nota,Deskripsi,Nominal,Total");
        assert_eq!(lines[1], "1,Andi,,,Tiket pesawat 500.000,500000,1250000");
        assert_eq!(lines[3], "2,Budi,,,\"Tiket, kereta 300.000\",300000,300000");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_table_view_json() {
        let view = TableView::new("Laporan Dinas", rows());
        assert_eq!(view.summary.entries, 3);
        assert_eq!(view.summary.people, 2);
        assert_eq!(view.summary.grand_total, 1_550_000);

        let json: serde_json::Value = serde_json::from_slice(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["title"], "Laporan Dinas");
        assert_eq!(json["rows"][0]["name"], "Andi");
        assert_eq!(json["summary"]["grand_total"], 1_550_000);
    }
}
