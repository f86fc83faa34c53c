//! # Licensee Categories
//!
//! Age/sex categories follow a naming convention that encodes the rule:
//!
//! ```text
//! ┌──────────────┬──────────┬──────────────────────────────────────────────┐
//! │ Name         │ Rule     │ Description for reference season 2026        │
//! ├──────────────┼──────────┼──────────────────────────────────────────────┤
//! │ U10-U11 G    │ Range    │ Né en 2016 ou 2017                           │
//! │ U7 F         │ Single   │ Née en 2020                                  │
//! │ SENIORS F    │ Seniors  │ Née avant ou en 2007                         │
//! │ Loisirs      │ Custom   │ (free text, kept as edited)                  │
//! └──────────────┴──────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Descriptions are a pure projection of `(name, reference season)`:
//! re-deriving never looks at the previous description, except for custom
//! categories whose description is never touched.
//!
//! Matching a new registration to a category reads the *description*
//! (the years written in it) together with the sex suffix of the name.
//! Matching uses the calendar birth year; minority uses the exact age on
//! a given date ([`age_on`]). The two are kept separate.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::types::{LicenseeCategory, Sex};

/// Age used for the seniors cut-off year.
pub const SENIORS_AGE: u16 = 19;

/// Below this age a registration needs a legal representative.
pub const MAJORITY_AGE: i32 = 18;

/// Marker of the seniors description ("Né avant ou en 2007").
const ON_OR_BEFORE: &str = "avant ou en";

// ASCII digits only
static STARTS_WITH_U_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^U[0-9]").expect("valid regex"));
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^U([0-9]+)-U([0-9]+)").expect("valid regex"));
static SINGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^U([0-9]+)").expect("valid regex"));
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid regex"));

// =============================================================================
// Age Rules
// =============================================================================

/// The age rule encoded in a category name.
///
/// Ages are `u16`: a name whose age does not fit ("U99999 G") is custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeRule {
    /// "SENIORS G/F": born on or before `season - age`.
    Seniors { age: u16 },
    /// "U10-U11 G": a two-year band.
    Range(u16, u16),
    /// "U7 F": a single birth year.
    Single(u16),
    /// Anything else ("Loisirs", "Vétérans"): description is free text.
    Custom,
}

impl AgeRule {
    /// Reads the rule from a category name (case-insensitive, trimmed).
    pub fn from_name(name: &str) -> AgeRule {
        let upper = name.trim().to_uppercase();

        if upper.starts_with("SENIORS") {
            return AgeRule::Seniors { age: SENIORS_AGE };
        }
        if !STARTS_WITH_U_DIGIT.is_match(&upper) {
            return AgeRule::Custom;
        }

        if let Some(caps) = RANGE_RE.captures(&upper) {
            return match (caps[1].parse(), caps[2].parse()) {
                (Ok(n), Ok(m)) => AgeRule::Range(n, m),
                _ => AgeRule::Custom,
            };
        }

        match SINGLE_RE.captures(&upper).map(|caps| caps[1].parse()) {
            Some(Ok(n)) => AgeRule::Single(n),
            _ => AgeRule::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, AgeRule::Custom)
    }
}

// =============================================================================
// Description Derivation
// =============================================================================

/// Derives the description of `category` for `reference_season` (the
/// ending year of the season, 2026 for 2025-2026).
///
/// Custom categories return their current description unchanged, and so
/// does a season so far out that the birth year would not fit an `i32`.
///
/// ```rust
/// use club_core::category::derive_description;
/// use club_core::LicenseeCategory;
///
/// let cat = LicenseeCategory {
///     id: "lc-1".into(),
///     name: "U10-U11 G".into(),
///     description: String::new(),
///     color: String::new(),
/// };
/// assert_eq!(derive_description(&cat, 2026), "Né en 2016 ou 2017");
/// ```
pub fn derive_description(category: &LicenseeCategory, reference_season: i32) -> String {
    let rule = AgeRule::from_name(&category.name);
    let born = if category.name.trim().to_uppercase().contains(" F") {
        "Née"
    } else {
        "Né"
    };

    let described = match rule {
        AgeRule::Custom => None,
        AgeRule::Seniors { age } => born_in(reference_season, i32::from(age))
            .map(|year| format!("{born} {ON_OR_BEFORE} {year}")),
        AgeRule::Range(n, m) => {
            // U11 means "under 11 at the end of the season": 10 years old
            let age1 = i32::from(n) - 1;
            let age2 = i32::from(m) - 1;
            born_in(reference_season, age1.max(age2))
                .zip(born_in(reference_season, age1.min(age2)))
                .map(|(year1, year2)| format!("{born} en {year1} ou {year2}"))
        }
        AgeRule::Single(n) => born_in(reference_season, i32::from(n) - 1)
            .map(|year| format!("{born} en {year}")),
    };

    described.unwrap_or_else(|| category.description.clone())
}

fn born_in(reference_season: i32, age: i32) -> Option<i32> {
    reference_season.checked_sub(age)
}

/// Projects a whole catalog onto `reference_season`, regenerating every
/// non-custom description. Order is preserved.
pub fn with_season_descriptions(
    categories: &[LicenseeCategory],
    reference_season: i32,
) -> Vec<LicenseeCategory> {
    categories
        .iter()
        .map(|category| LicenseeCategory {
            description: derive_description(category, reference_season),
            ..category.clone()
        })
        .collect()
}

// =============================================================================
// Category Matching
// =============================================================================

/// Finds the category of a licensee from birth date and sex.
///
/// ## Rules
/// 1. Only categories whose name ends with " G"/" F" (or starts with
///    "SENIORS G"/"SENIORS F") for the licensee's sex are considered.
/// 2. The four-digit years written in the description decide:
///    - "avant ou en Y": birth year <= Y
///    - two years: birth year is either one
///    - one year: birth year equals it
/// 3. Catalog order decides ties: the first match wins.
///
/// `None` means the category must be picked by hand. That is expected for
/// custom categories and is not an error.
pub fn match_category<'a>(
    birth_date: NaiveDate,
    sex: Sex,
    categories: &'a [LicenseeCategory],
) -> Option<&'a str> {
    let birth_year = birth_date.year();
    let suffix = sex.category_suffix();
    let ends_with = format!(" {suffix}");
    let seniors_prefix = format!("SENIORS {suffix}");

    categories
        .iter()
        .filter(|category| {
            let upper = category.name.trim().to_uppercase();
            upper.ends_with(&ends_with) || upper.starts_with(&seniors_prefix)
        })
        .find(|category| description_admits(&category.description, birth_year))
        .map(|category| category.id.as_str())
}

fn description_admits(description: &str, birth_year: i32) -> bool {
    let years: Vec<i32> = YEAR_RE
        .find_iter(description)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    if description.contains(ON_OR_BEFORE) {
        return years.first().is_some_and(|&limit| birth_year <= limit);
    }

    match years.as_slice() {
        [year1, year2] => birth_year == *year1 || birth_year == *year2,
        [year] => birth_year == *year,
        _ => false,
    }
}

// =============================================================================
// Age
// =============================================================================

/// Age in whole years on `as_of`, counting the birthday itself.
///
/// `as_of` is an explicit argument: a registration freezes its date once
/// so the minor/adult decision cannot change between form load and submit.
pub fn age_on(birth_date: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut age = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Whether someone born on `birth_date` is a minor on `as_of`.
pub fn is_minor(birth_date: NaiveDate, as_of: NaiveDate) -> bool {
    age_on(birth_date, as_of) < MAJORITY_AGE
}

// =============================================================================
// Unit Tests
// =============================================================================
