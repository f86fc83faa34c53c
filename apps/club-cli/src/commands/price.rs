//! `club price`: what a licensee owes and why.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

use club_core::pricing::{licensee_breakdown, remaining_due, PriceBreakdown};
use club_core::{Money, PaymentStatus};

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceReport<'a> {
    licensee_id: &'a str,
    pack_name: &'a str,
    payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount_paid: Option<Money>,
    remaining_due: Money,
    breakdown: PriceBreakdown,
}

pub fn run(
    snapshot: &Snapshot,
    licensee_id: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let licensee = snapshot.licensee(licensee_id)?;
    let pack = snapshot.pack(&licensee.pack_id)?;
    let breakdown = licensee_breakdown(licensee, &snapshot.packs, &snapshot.settings.reductions)?;

    for id in &breakdown.dangling {
        warn!(licensee = %licensee.id, reduction = %id, "Applied reduction missing from settings, ignored");
    }

    let report = PriceReport {
        licensee_id: &licensee.id,
        pack_name: &pack.name,
        payment_status: licensee.payment_status,
        amount_paid: licensee.amount_paid,
        remaining_due: remaining_due(
            breakdown.final_price,
            licensee.payment_status,
            licensee.amount_paid,
        ),
        breakdown,
    };

    if json {
        return write_json(out, &report);
    }

    let b = &report.breakdown;
    writeln!(out, "{} ({})", licensee.full_name(), report.pack_name)?;
    writeln!(out, "  Pack price       {:>12}", b.base.to_string())?;
    for reduction in &b.applied {
        writeln!(out, "  {:<16} {:>12}", reduction.name, reduction.label())?;
    }
    writeln!(out, "  Final price      {:>12}", b.final_price.to_string())?;
    writeln!(out, "  Status           {:>12}", report.payment_status.label())?;
    writeln!(out, "  Remaining due    {:>12}", report.remaining_due.to_string())?;
    Ok(())
}
