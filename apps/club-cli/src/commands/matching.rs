//! `club match`: which category a birth date and sex fall into.

use std::io::Write;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use club_core::category::{age_on, is_minor};
use club_core::{match_category, Sex};

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexArg {
    /// Garçon
    #[value(alias = "g", alias = "m")]
    Male,
    /// Fille
    #[value(alias = "f")]
    Female,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchReport<'a> {
    category_id: Option<&'a str>,
    category_name: Option<&'a str>,
    age: i32,
    minor: bool,
}

pub fn run(
    snapshot: &Snapshot,
    born: NaiveDate,
    sex: Sex,
    as_of: NaiveDate,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let category_id = match_category(born, sex, &snapshot.licensee_categories);
    let category = category_id
        .and_then(|id| snapshot.licensee_categories.iter().find(|c| c.id == id));

    let report = MatchReport {
        category_id,
        category_name: category.map(|c| c.name.as_str()),
        age: age_on(born, as_of),
        minor: is_minor(born, as_of),
    };

    if json {
        return write_json(out, &report);
    }

    match category {
        Some(category) => writeln!(
            out,
            "{} ({}): {}",
            category.name, category.id, category.description
        )?,
        None => writeln!(out, "No category matches, pick one by hand")?,
    }
    let who = if report.minor { "minor" } else { "adult" };
    writeln!(out, "Age on {}: {} ({})", as_of, report.age, who)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{date, output, snapshot};

    #[test]
    fn test_matches_by_birth_year() {
        let mut buf = Vec::new();
        run(
            &snapshot(),
            date(2016, 7, 30),
            Sex::Female,
            date(2025, 10, 1),
            false,
            &mut buf,
        )
        .unwrap();
        let text = output(buf);

        assert!(text.contains("U10-U11 F (lc-u10f)"));
        assert!(text.contains("Age on 2025-10-01: 9 (minor)"));
    }

    #[test]
    fn test_no_match_for_other_sex() {
        let mut buf = Vec::new();
        run(
            &snapshot(),
            date(2016, 7, 30),
            Sex::Male,
            date(2025, 10, 1),
            true,
            &mut buf,
        )
        .unwrap();
        let report: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert!(report["categoryId"].is_null());
        assert_eq!(report["minor"], true);
    }
}
