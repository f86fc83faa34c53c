//! `club validate`: registration forms and import rows checked offline.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use club_core::category::is_minor;
use club_core::registration::{
    suggest_category, validate_import_row, validate_registration, ImportRow, RegistrationForm,
};
use club_core::ValidationErrors;

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

#[derive(Debug, Serialize)]
struct FieldIssue {
    field: String,
    message: String,
}

fn issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    errors
        .iter()
        .map(|e| FieldIssue {
            field: e.field().to_string(),
            message: e.to_string(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormReport<'a> {
    valid: bool,
    minor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_category: Option<&'a str>,
    errors: Vec<FieldIssue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RowReport {
    /// 1-based, as shown to the operator
    row: usize,
    valid: bool,
    errors: Vec<FieldIssue>,
}

/// Validates one registration form. Returns whether it is valid.
pub fn run_form(
    snapshot: &Snapshot,
    raw: &str,
    as_of: NaiveDate,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool, CliError> {
    let form: RegistrationForm = serde_json::from_str(raw)?;
    let errors = validate_registration(&form, as_of).err().unwrap_or_default();

    let report = FormReport {
        valid: errors.is_empty(),
        minor: is_minor(form.date_of_birth, as_of),
        suggested_category: suggest_category(&form, &snapshot.licensee_categories),
        errors: issues(&errors),
    };

    if json {
        write_json(out, &report)?;
        return Ok(report.valid);
    }

    if report.valid {
        writeln!(out, "Form is valid")?;
    }
    for issue in &report.errors {
        writeln!(out, "  {}: {}", issue.field, issue.message)?;
    }
    if report.minor {
        writeln!(out, "Minor on {as_of}: legal representative required")?;
    }
    match report.suggested_category {
        Some(id) => writeln!(out, "Suggested category: {id}")?,
        None => writeln!(out, "Suggested category: none")?,
    }
    Ok(report.valid)
}

/// Validates a JSON array of import rows. Returns whether all are valid.
pub fn run_import(
    snapshot: &Snapshot,
    raw: &str,
    as_of: NaiveDate,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool, CliError> {
    let rows: Vec<ImportRow> = serde_json::from_str(raw)?;

    let reports: Vec<RowReport> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let errors = validate_import_row(
                row,
                &snapshot.packs,
                &snapshot.licensee_categories,
                as_of,
            )
            .err()
            .unwrap_or_default();
            RowReport {
                row: i + 1,
                valid: errors.is_empty(),
                errors: issues(&errors),
            }
        })
        .collect();
    let all_valid = reports.iter().all(|r| r.valid);

    if json {
        write_json(out, &reports)?;
        return Ok(all_valid);
    }

    let valid = reports.iter().filter(|r| r.valid).count();
    writeln!(out, "{} of {} rows valid", valid, reports.len())?;
    for report in reports.iter().filter(|r| !r.valid) {
        for issue in &report.errors {
            writeln!(out, "  row {}: {}", report.row, issue.message)?;
        }
    }
    Ok(all_valid)
}
