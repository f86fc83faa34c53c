//! `club categories`: the category catalog with season descriptions.

use std::io::Write;

use serde::Serialize;

use club_core::category::{with_season_descriptions, AgeRule};
use club_core::{LicenseeCategory, Season};

use super::write_json;
use crate::error::CliError;
use crate::snapshot::Snapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRow<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    color: &'a str,
    custom: bool,
}

impl<'a> From<&'a LicenseeCategory> for CategoryRow<'a> {
    fn from(category: &'a LicenseeCategory) -> Self {
        CategoryRow {
            id: &category.id,
            name: &category.name,
            description: &category.description,
            color: &category.color,
            custom: AgeRule::from_name(&category.name).is_custom(),
        }
    }
}

/// Lists categories, projected on `season` when given instead of the
/// stored reference season.
pub fn run(
    snapshot: &Snapshot,
    season: Option<i32>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let reference = Season::new(season.unwrap_or(snapshot.settings.reference_season));
    let categories = match season {
        Some(season) => with_season_descriptions(&snapshot.licensee_categories, season),
        None => snapshot.licensee_categories.clone(),
    };

    if json {
        let rows: Vec<CategoryRow<'_>> = categories.iter().map(CategoryRow::from).collect();
        return write_json(out, &rows);
    }

    writeln!(out, "Season {reference}")?;
    for category in &categories {
        writeln!(out, "{:<16} {:<14} {}", category.id, category.name, category.description)?;
    }
    Ok(())
}
