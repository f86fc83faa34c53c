//! `club stock`: managed, assigned and available quantities per size.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use club_core::equipment::sizes_for;
use club_core::stock::{latest_update, StockLevel};
use club_core::EquipmentItem;

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockRow<'a> {
    item: &'a str,
    size: &'a str,
    managed: i64,
    assigned: i64,
    available: i64,
    level: StockLevel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    last_update: Option<DateTime<Utc>>,
    rows: Vec<StockRow<'a>>,
}

/// Reports every size of every catalog item, or of `item` only.
pub fn run(
    snapshot: &Snapshot,
    item: Option<&str>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let items: Vec<&EquipmentItem> = match item {
        Some(name) => vec![snapshot.equipment_item(name)?],
        None => snapshot.equipment.iter().collect(),
    };

    let ledger = snapshot.ledger();
    let mut rows = Vec::new();
    for item in items {
        for size in sizes_for(item, &snapshot.equipment_categories) {
            let available = ledger.available(&item.name, &size.name);
            rows.push(StockRow {
                item: &item.name,
                size: &size.name,
                managed: ledger.managed(&item.name, &size.name),
                assigned: ledger.assigned(&item.name, &size.name),
                available,
                level: StockLevel::from_available(available),
            });
        }
    }

    let report = StockReport {
        last_update: latest_update(&snapshot.stock),
        rows,
    };

    if json {
        return write_json(out, &report);
    }

    match report.last_update {
        Some(at) => writeln!(out, "Last update: {}", at.format("%d/%m/%Y %H:%M"))?,
        None => writeln!(out, "Last update: never")?,
    }
    writeln!(
        out,
        "{:<20} {:<6} {:>7} {:>8} {:>9}  LEVEL",
        "ITEM", "SIZE", "MANAGED", "ASSIGNED", "AVAILABLE"
    )?;
    for row in &report.rows {
        writeln!(
            out,
            "{:<20} {:<6} {:>7} {:>8} {:>9}  {}",
            row.item,
            row.size,
            row.managed,
            row.assigned,
            row.available,
            row.level.label()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{output, snapshot};
    use club_core::CoreError;

    #[test]
    fn test_reports_every_size() {
        let mut buf = Vec::new();
        run(&snapshot(), None, true, &mut buf).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rows = report["rows"].as_array().unwrap();

        // 2 items x 2 sizes
        assert_eq!(rows.len(), 4);
        assert!(report.get("lastUpdate").is_none());

        let maillot_m = rows
            .iter()
            .find(|r| r["item"] == "Maillot" && r["size"] == "M")
            .unwrap();
        assert_eq!(maillot_m["managed"], 1);
        assert_eq!(maillot_m["assigned"], 1);
        assert_eq!(maillot_m["available"], 0);
        assert_eq!(maillot_m["level"], "critical");

        let short_s = rows
            .iter()
            .find(|r| r["item"] == "Short" && r["size"] == "S")
            .unwrap();
        assert_eq!(short_s["available"], 12);
        assert_eq!(short_s["level"], "ok");
    }

    #[test]
    fn test_single_item_text() {
        let mut buf = Vec::new();
        run(&snapshot(), Some("Short"), false, &mut buf).unwrap();
        let text = output(buf);

        assert!(text.contains("Last update: never"));
        assert!(text.contains("Short"));
        assert!(!text.contains("Maillot"));
    }

    #[test]
    fn test_unknown_item() {
        let mut buf = Vec::new();
        let err = run(&snapshot(), Some("Casquette"), false, &mut buf).unwrap_err();
        assert!(matches!(err, CliError::Core(CoreError::EquipmentNotFound(_))));
    }
}
