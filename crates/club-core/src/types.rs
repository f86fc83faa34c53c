//! # Domain Types
//!
//! Core domain types used throughout the club licence tools.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ LicenseeCategory │   │     Licensee     │   │      Pack        │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  id              │◄──│  category id     │──►│  id              │    │
//! │  │  name "U10 G"    │   │  pack id         │   │  price           │    │
//! │  │  description     │   │  reductions[] ───┼─┐ │  composition[] ──┼─┐  │
//! │  └──────────────────┘   │  assigned[]      │ │ └──────────────────┘ │  │
//! │                         └──────────────────┘ │                      │  │
//! │  ┌──────────────────┐   ┌──────────────────┐ │ ┌──────────────────┐ │  │
//! │  │   StockEntry     │   │    Reduction     │◄┘ │  EquipmentItem   │◄┘  │
//! │  │  item + size     │   │  amount          │   │  name (by name!) │    │
//! │  │  managed qty     │   │  multiplier      │   │  size category   │    │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Compatibility
//! Every type deserializes from the JSON files the web application writes:
//! camelCase keys, French status labels, decimal euro amounts, and dates
//! either as `YYYY-MM-DD` or as JavaScript `Date` timestamps.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, Multiplier};

// =============================================================================
// Licensee Category
// =============================================================================

/// An age/sex category a licensee plays in ("U10-U11 G", "SENIORS F").
///
/// `description` is derived from `name` and the reference season for every
/// recognised name pattern; see [`crate::category::derive_description`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LicenseeCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

// =============================================================================
// Packs and Equipment
// =============================================================================

/// A purchasable bundle of equipment items at a fixed price.
///
/// `composition` references equipment items by *name*. Renaming an item
/// must go through [`crate::equipment::rename_equipment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub price: Money,
    #[serde(default)]
    pub composition: Vec<String>,
}

/// A catalog equipment item ("Maillot", "Short").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EquipmentItem {
    pub id: String,
    pub name: String,
    /// Id of the [`EquipmentCategory`] that defines the available sizes.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_adulte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_enfant: Option<String>,
}

/// A size label within an equipment category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Size {
    pub id: String,
    pub name: String,
}

/// A group of equipment sharing one size chart ("Textile": S..XXL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EquipmentCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sizes: Vec<Size>,
}

// =============================================================================
// Reductions
// =============================================================================

/// A discount rule from the settings catalog.
///
/// Both parts may combine: the price is first scaled by `multiplier`
/// (default ×1), then `amount` is subtracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Reduction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    #[ts(type = "number")]
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub multiplier: Option<Multiplier>,
}

impl Reduction {
    /// The multiplier, ×1 when unset or 0. A cleared settings field is
    /// stored as `0` and means "no multiplier".
    #[inline]
    pub fn multiplier(&self) -> Multiplier {
        match self.multiplier {
            Some(m) if m.bps() != 0 => m,
            _ => Multiplier::ONE,
        }
    }
}

/// A reduction applied to one registration.
///
/// `note` is specific to this application (a voucher number, say) and is
/// distinct from the catalog reduction's own note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedReduction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AppliedReduction {
    pub fn new(id: impl Into<String>) -> Self {
        AppliedReduction {
            id: id.into(),
            note: None,
        }
    }
}

// =============================================================================
// Statuses
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Suffix used in category names: "G" (garçons) or "F" (filles).
    pub const fn category_suffix(&self) -> char {
        match self {
            Sex::Male => 'G',
            Sex::Female => 'F',
        }
    }
}

/// Payment progress of a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "En attente")]
    Pending,
    #[serde(rename = "Payé")]
    Paid,
    #[serde(rename = "Partiel")]
    Partial,
}

impl PaymentStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "En attente",
            PaymentStatus::Paid => "Payé",
            PaymentStatus::Partial => "Partiel",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Equipment hand-out progress of a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EquipmentStatus {
    #[default]
    #[serde(rename = "En attente")]
    Pending,
    /// Every item handed out from stock.
    #[serde(rename = "Attribué")]
    Assigned,
    /// At least one item was force-assigned while out of stock.
    #[serde(rename = "Incomplet")]
    Incomplete,
}

impl EquipmentStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            EquipmentStatus::Pending => "En attente",
            EquipmentStatus::Assigned => "Attribué",
            EquipmentStatus::Incomplete => "Incomplet",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    #[serde(rename = "Espèces")]
    Cash,
    #[serde(rename = "Chèque")]
    Cheque,
    #[serde(rename = "CB")]
    Card,
    #[serde(rename = "Virement")]
    Transfer,
}

// =============================================================================
// Licensee
// =============================================================================

/// Parent or guardian attached to a minor's registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LegalRepresentative {
    pub last_name: String,
    pub first_name: String,
    #[serde(with = "date_format")]
    #[ts(as = "String")]
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub place_of_birth: String,
    #[serde(default)]
    pub born_abroad: bool,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_phone: Option<String>,
}

/// One equipment item handed to a licensee.
///
/// `out_of_stock` is frozen at assignment time: it records that the item
/// was forced while no stock was available, and it is never re-evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AssignedEquipment {
    pub name: String,
    pub size: String,
    #[serde(default)]
    pub out_of_stock: bool,
}

/// A club member registration for the current season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Licensee {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub sex: Sex,
    #[serde(with = "date_format")]
    #[ts(as = "String")]
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub place_of_birth: String,
    #[serde(default)]
    pub born_abroad: bool,
    pub licensee_category_id: String,
    pub pack_id: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[ts(as = "String")]
    pub registration_date: DateTime<Utc>,

    // --- payment ---
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(
        default,
        with = "date_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub payment_date: Option<NaiveDate>,
    /// Only meaningful while the status is `Partiel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub amount_paid: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_comment: Option<String>,
    #[serde(default)]
    pub reductions: Vec<AppliedReduction>,

    // --- equipment ---
    #[serde(default)]
    pub equipment_status: EquipmentStatus,
    #[serde(default)]
    pub assigned_equipment: Vec<AssignedEquipment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_representative: Option<LegalRepresentative>,
}

impl Licensee {
    /// "First Last", the form used in emails and listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this licensee holds an in-stock (counted) assignment of
    /// `equipment` in `size`.
    pub fn holds_counted(&self, equipment: &str, size: &str) -> bool {
        self.assigned_equipment
            .iter()
            .any(|a| a.name == equipment && a.size == size && !a.out_of_stock)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Administrator-entered stock count for one item and size.
///
/// `quantity` is the *managed* stock. Available stock is always derived
/// (see [`crate::stock`]) and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub equipment_name: String,
    pub size_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub last_modified: Option<DateTime<Utc>>,
}

// =============================================================================
// Settings
// =============================================================================

/// Club identity used in email footers and documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClubInfo {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
}

impl Default for ClubInfo {
    fn default() -> Self {
        ClubInfo {
            name: "Trapel Football Club".to_string(),
            address: "Adresse à compléter".to_string(),
            email: None,
            phone: None,
            responsible_name: None,
            facebook_url: None,
            instagram_url: None,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Ending year of the current season (2026 for 2025-2026).
    pub reference_season: i32,
    #[serde(default)]
    pub reductions: Vec<Reduction>,
    #[serde(default)]
    pub club_info: ClubInfo,
}

impl AppSettings {
    pub fn season(&self) -> Season {
        Season::new(self.reference_season)
    }
}

/// `settings.json` as stored, where every key may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    pub reference_season: Option<i32>,
    pub reductions: Option<Vec<Reduction>>,
    pub club_info: Option<ClubInfo>,
}

impl StoredSettings {
    /// Fills missing keys. The season falls back to the year of `today`,
    /// which the caller supplies so this stays clock-free.
    pub fn resolve(self, today: NaiveDate) -> AppSettings {
        AppSettings {
            reference_season: self.reference_season.unwrap_or_else(|| today.year()),
            reductions: self.reductions.unwrap_or_default(),
            club_info: self.club_info.unwrap_or_default(),
        }
    }
}

/// A season identified by its ending year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season(i32);

impl Season {
    pub const fn new(reference_year: i32) -> Self {
        Season(reference_year)
    }

    pub const fn reference_year(&self) -> i32 {
        self.0
    }

    /// "2025-2026" for reference season 2026. Also the archive key.
    pub fn label(&self) -> String {
        format!("{}-{}", i64::from(self.0) - 1, self.0)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// =============================================================================
// Email Templates
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailTemplate {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl EmailTemplate {
    /// Both subject and body are filled in.
    pub fn is_complete(&self) -> bool {
        !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplates {
    #[serde(default)]
    pub payment_confirmation: EmailTemplate,
    #[serde(default)]
    pub equipment_complete: EmailTemplate,
    #[serde(default)]
    pub equipment_incomplete: EmailTemplate,
}

/// Which automatic email to compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailKind {
    PaymentConfirmation,
    EquipmentComplete,
    EquipmentIncomplete,
}

impl EmailKind {
    /// Key of the template in `email-templates.json`.
    pub const fn key(&self) -> &'static str {
        match self {
            EmailKind::PaymentConfirmation => "paymentConfirmation",
            EmailKind::EquipmentComplete => "equipmentComplete",
            EmailKind::EquipmentIncomplete => "equipmentIncomplete",
        }
    }

    /// The equipment email matching an assignment outcome.
    pub const fn for_equipment(status: EquipmentStatus) -> EmailKind {
        match status {
            EquipmentStatus::Assigned => EmailKind::EquipmentComplete,
            _ => EmailKind::EquipmentIncomplete,
        }
    }
}

impl EmailTemplates {
    pub fn get(&self, kind: EmailKind) -> &EmailTemplate {
        match kind {
            EmailKind::PaymentConfirmation => &self.payment_confirmation,
            EmailKind::EquipmentComplete => &self.equipment_complete,
            EmailKind::EquipmentIncomplete => &self.equipment_incomplete,
        }
    }
}

// =============================================================================
// Date Wire Format
// =============================================================================

/// Calendar dates as written by the web application.
///
/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp as produced by
/// `JSON.stringify(new Date(..))`. Timestamps are rounded to the nearest
/// UTC day: a date picked at local midnight in Europe serializes as
/// 22:00/23:00 UTC on the previous day and must read back as the picked
/// day. Always writes `YYYY-MM-DD`.
pub mod date_format {
    use chrono::{DateTime, Duration, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    /// Parses a date in either accepted shape.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, FORMAT) {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|ts| (ts.naive_utc() + Duration::hours(12)).date())
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}"))),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
