//! `club assign`: dry run of an equipment assignment.
//!
//! ```text
//! draft (pack or previous picks)
//!   └─ --size ITEM=SIZE overrides
//!        └─ size options from the ledger (licensee excluded)
//!             └─ finalize: Attribué / Incomplet, or OutOfStock
//! ```
//!
//! Nothing is written: the command shows what the web dialog would record.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

use club_core::equipment::{
    awaiting_assignment, draft_assignments, finalize_assignment, pick_size, size_options,
    sizes_for, Assignment, Selection, SizeOption,
};

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

/// Parses `ITEM=SIZE` for `--size`.
pub fn parse_selection(raw: &str) -> Result<Selection, String> {
    match raw.split_once('=') {
        Some((name, size)) if !name.trim().is_empty() && !size.trim().is_empty() => {
            Ok(Selection::new(name.trim(), size.trim()))
        }
        _ => Err(format!("expected ITEM=SIZE, got '{raw}'")),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotReport {
    name: String,
    size: String,
    options: Vec<SizeOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignReport<'a> {
    licensee_id: &'a str,
    force: bool,
    slots: Vec<SlotReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignment: Option<Assignment>,
}

pub fn run(
    snapshot: &Snapshot,
    licensee_id: &str,
    overrides: &[Selection],
    force: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let licensee = snapshot.licensee(licensee_id)?;
    if !awaiting_assignment(licensee) {
        warn!(
            licensee = %licensee.id,
            payment = %licensee.payment_status,
            equipment = %licensee.equipment_status,
            "Licensee is not waiting for equipment"
        );
    }

    let pack = snapshot.pack(&licensee.pack_id)?;
    let mut selections = draft_assignments(licensee, pack);
    for pick in overrides {
        if pick_size(&mut selections, &pick.name, &pick.size) == 0 {
            return Err(CliError::usage(format!(
                "'{}' is not part of {}",
                pick.name, pack.name
            )));
        }
    }

    let ledger = snapshot.ledger_excluding(&licensee.id);
    let slots: Vec<SlotReport> = selections
        .iter()
        .map(|selection| {
            let options = match snapshot.equipment_item(&selection.name) {
                Ok(item) => size_options(
                    &item.name,
                    sizes_for(item, &snapshot.equipment_categories),
                    &ledger,
                    force,
                ),
                Err(_) => {
                    warn!(item = %selection.name, "Pack item missing from the equipment catalog");
                    Vec::new()
                }
            };
            SlotReport {
                name: selection.name.clone(),
                size: selection.size.clone(),
                options,
            }
        })
        .collect();

    let assignment = if selections.iter().all(Selection::is_picked) {
        Some(finalize_assignment(&selections, &ledger, force)?)
    } else {
        None
    };

    let report = AssignReport {
        licensee_id: &licensee.id,
        force,
        slots,
        assignment,
    };

    if json {
        return write_json(out, &report);
    }

    writeln!(out, "{} ({})", licensee.full_name(), pack.name)?;
    for slot in &report.slots {
        let picked = if slot.size.is_empty() { "-" } else { slot.size.as_str() };
        let options: Vec<String> = slot
            .options
            .iter()
            .map(|o| {
                let mark = if o.in_stock { "" } else { "!" };
                format!("{}{}({})", o.size, mark, o.available)
            })
            .collect();
        writeln!(out, "  {:<20} {:<6} {}", slot.name, picked, options.join(" "))?;
    }

    match &report.assignment {
        Some(assignment) => {
            writeln!(out, "Status: {}", assignment.status)?;
            for missing in assignment.missing() {
                writeln!(out, "  out of stock: {} {}", missing.name, missing.size)?;
            }
        }
        None => writeln!(out, "Pick a size for every item with --size ITEM=SIZE")?,
    }
    Ok(())
}
