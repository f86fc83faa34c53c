//! # Registration
//!
//! Creating licensees from the registration form or an import file, and
//! recording payments on them.
//!
//! ## Form Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every registration                                                     │
//! │  ├── lastName, firstName   >= 2 characters                              │
//! │  ├── email                 valid address                                │
//! │  ├── phone                 >= 10 characters                             │
//! │  └── category, pack        selected                                     │
//! │                                                                         │
//! │  Minor on the registration date (age_on < 18)                           │
//! │  └── legalRepresentative                                                │
//! │      ├── lastName, firstName, placeOfBirth   >= 2 characters            │
//! │      ├── email                               valid address              │
//! │      ├── dateOfBirth                         present                    │
//! │      └── fatherPhone or motherPhone          at least one               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The date used for the minor check is passed in explicitly and frozen
//! for the whole registration.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::category::{is_minor, match_category};
use crate::error::{ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::{
    date_format, AppliedReduction, EquipmentStatus, LegalRepresentative, Licensee,
    LicenseeCategory, Pack, PaymentMethod, PaymentStatus, Sex,
};
use crate::validation::{
    validate_email, validate_name, validate_phone, validate_required, MIN_NAME_LEN,
};

/// Generates a new licensee id (`lic-<uuid>`).
pub fn new_licensee_id() -> String {
    format!("lic-{}", Uuid::new_v4())
}

// =============================================================================
// Registration Form
// =============================================================================

/// Legal representative fields as typed in the form. All optional: an
/// adult's form may leave them empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalRepresentativeForm {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    #[serde(with = "date_format::option")]
    pub date_of_birth: Option<NaiveDate>,
    pub place_of_birth: Option<String>,
    pub born_abroad: Option<bool>,
    pub email: Option<String>,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl LegalRepresentativeForm {
    /// The representative to store, when every identity field is present.
    pub fn to_representative(&self) -> Option<LegalRepresentative> {
        Some(LegalRepresentative {
            last_name: non_empty(&self.last_name)?.to_string(),
            first_name: non_empty(&self.first_name)?.to_string(),
            date_of_birth: self.date_of_birth?,
            place_of_birth: non_empty(&self.place_of_birth)?.to_string(),
            born_abroad: self.born_abroad.unwrap_or(false),
            email: non_empty(&self.email)?.to_string(),
            father_phone: non_empty(&self.father_phone).map(str::to_string),
            mother_phone: non_empty(&self.mother_phone).map(str::to_string),
        })
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        errors.check(validate_name(
            "legalRepresentative.lastName",
            &text(&self.last_name),
            MIN_NAME_LEN,
        ));
        errors.check(validate_name(
            "legalRepresentative.firstName",
            &text(&self.first_name),
            MIN_NAME_LEN,
        ));
        errors.check(validate_email(
            "legalRepresentative.email",
            &text(&self.email),
        ));
        if self.date_of_birth.is_none() {
            errors.push(ValidationError::Required {
                field: "legalRepresentative.dateOfBirth".to_string(),
            });
        }
        errors.check(validate_name(
            "legalRepresentative.placeOfBirth",
            &text(&self.place_of_birth),
            MIN_NAME_LEN,
        ));
        if non_empty(&self.father_phone).is_none() && non_empty(&self.mother_phone).is_none() {
            errors.push(ValidationError::Required {
                field: "legalRepresentative.fatherPhone".to_string(),
            });
        }
    }
}

/// A new registration as submitted by the front desk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub last_name: String,
    pub first_name: String,
    pub sex: Sex,
    #[serde(with = "date_format")]
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub born_abroad: bool,
    #[serde(default)]
    pub licensee_category_id: String,
    #[serde(default)]
    pub pack_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub legal_representative: Option<LegalRepresentativeForm>,
}

/// Checks a registration form, reporting every failing field.
pub fn validate_registration(
    form: &RegistrationForm,
    as_of: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_name("lastName", &form.last_name, MIN_NAME_LEN));
    errors.check(validate_name("firstName", &form.first_name, MIN_NAME_LEN));
    errors.check(validate_required(
        "licenseeCategoryId",
        &form.licensee_category_id,
    ));
    errors.check(validate_required("packId", &form.pack_id));
    errors.check(validate_phone("phone", &form.phone));
    errors.check(validate_email("email", &form.email));

    if is_minor(form.date_of_birth, as_of) {
        form.legal_representative
            .clone()
            .unwrap_or_default()
            .validate(&mut errors);
    }

    errors.into_result()
}

/// Validates the form and builds the new licensee.
///
/// The licensee starts with both statuses pending, no reductions and no
/// equipment. A representative is attached only when complete.
pub fn register(
    form: RegistrationForm,
    id: String,
    now: DateTime<Utc>,
) -> Result<Licensee, ValidationErrors> {
    validate_registration(&form, now.date_naive())?;

    let legal_representative = form
        .legal_representative
        .as_ref()
        .and_then(LegalRepresentativeForm::to_representative);

    Ok(Licensee {
        id,
        last_name: form.last_name.trim().to_string(),
        first_name: form.first_name.trim().to_string(),
        sex: form.sex,
        date_of_birth: form.date_of_birth,
        place_of_birth: form.place_of_birth.unwrap_or_default(),
        born_abroad: form.born_abroad,
        licensee_category_id: form.licensee_category_id,
        pack_id: form.pack_id,
        phone: form.phone.trim().to_string(),
        email: form.email.trim().to_string(),
        registration_date: now,
        payment_status: PaymentStatus::Pending,
        payment_method: None,
        payment_date: None,
        amount_paid: None,
        payment_comment: None,
        reductions: Vec::new(),
        equipment_status: EquipmentStatus::Pending,
        assigned_equipment: Vec::new(),
        legal_representative,
    })
}

/// The category the form would be filed under, if one matches.
pub fn suggest_category<'a>(
    form: &RegistrationForm,
    categories: &'a [LicenseeCategory],
) -> Option<&'a str> {
    match_category(form.date_of_birth, form.sex, categories)
}

// =============================================================================
// Bulk Import
// =============================================================================

/// One row of the import file. Every cell is text; packs and categories
/// are referenced by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRow {
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub born_abroad: String,
    pub phone: String,
    pub email: String,
    pub licensee_category_name: String,
    pub pack_name: String,
    pub rep_first_name: String,
    pub rep_last_name: String,
    pub rep_date_of_birth: String,
    pub rep_place_of_birth: String,
    pub rep_born_abroad: String,
    pub rep_email: String,
    pub rep_father_phone: String,
    pub rep_mother_phone: String,
}

fn parse_sex(value: &str) -> Option<Sex> {
    match value.trim().to_lowercase().as_str() {
        "male" => Some(Sex::Male),
        "female" => Some(Sex::Female),
        _ => None,
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Checks an import row and resolves it into a registration form.
///
/// Import rules are looser than the front-desk form: names only need to
/// be present and the phone is free text.
pub fn validate_import_row(
    row: &ImportRow,
    packs: &[Pack],
    categories: &[LicenseeCategory],
    as_of: NaiveDate,
) -> Result<RegistrationForm, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_required("firstName", &row.first_name));
    errors.check(validate_required("lastName", &row.last_name));

    let sex = parse_sex(&row.sex);
    if sex.is_none() {
        errors.push(ValidationError::NotAllowed {
            field: "sex".to_string(),
            allowed: vec!["male".to_string(), "female".to_string()],
        });
    }

    let date_of_birth = date_format::parse(&row.date_of_birth);
    if date_of_birth.is_none() {
        errors.push(ValidationError::InvalidFormat {
            field: "dateOfBirth".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    errors.check(validate_email("email", &row.email));

    let pack = packs.iter().find(|p| p.name == row.pack_name);
    if pack.is_none() {
        errors.push(ValidationError::UnknownReference {
            field: "packName".to_string(),
            value: row.pack_name.clone(),
        });
    }

    let category = categories
        .iter()
        .find(|c| c.name == row.licensee_category_name);
    if category.is_none() {
        errors.push(ValidationError::UnknownReference {
            field: "licenseeCategoryName".to_string(),
            value: row.licensee_category_name.clone(),
        });
    }

    let minor = date_of_birth.is_some_and(|dob| is_minor(dob, as_of));
    let rep_date_of_birth = date_format::parse(&row.rep_date_of_birth);
    if minor {
        errors.check(validate_required("repFirstName", &row.rep_first_name));
        errors.check(validate_required("repLastName", &row.rep_last_name));
        errors.check(validate_email("repEmail", &row.rep_email));
        if rep_date_of_birth.is_none() {
            errors.push(ValidationError::InvalidFormat {
                field: "repDateOfBirth".to_string(),
                reason: "expected YYYY-MM-DD".to_string(),
            });
        }
    }

    let (sex, date_of_birth, pack, category) = match (sex, date_of_birth, pack, category) {
        (Some(sex), Some(dob), Some(pack), Some(category)) if errors.is_empty() => {
            (sex, dob, pack, category)
        }
        _ => return Err(errors),
    };

    let legal_representative = minor.then(|| LegalRepresentativeForm {
        last_name: optional(&row.rep_last_name),
        first_name: optional(&row.rep_first_name),
        date_of_birth: rep_date_of_birth,
        place_of_birth: optional(&row.rep_place_of_birth),
        born_abroad: Some(is_true(&row.rep_born_abroad)),
        email: optional(&row.rep_email),
        father_phone: optional(&row.rep_father_phone),
        mother_phone: optional(&row.rep_mother_phone),
    });

    Ok(RegistrationForm {
        last_name: row.last_name.trim().to_string(),
        first_name: row.first_name.trim().to_string(),
        sex,
        date_of_birth,
        place_of_birth: optional(&row.place_of_birth),
        born_abroad: is_true(&row.born_abroad),
        licensee_category_id: category.id.clone(),
        pack_id: pack.id.clone(),
        phone: row.phone.trim().to_string(),
        email: row.email.trim().to_string(),
        legal_representative,
    })
}

// =============================================================================
// Payment Updates
// =============================================================================

/// Payment fields edited on the payment screen. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentUpdate {
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(with = "date_format::option")]
    pub payment_date: Option<NaiveDate>,
    pub payment_comment: Option<String>,
    pub reductions: Option<Vec<AppliedReduction>>,
    pub amount_paid: Option<Money>,
}

/// What changed in a payment update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTransition {
    pub previous: PaymentStatus,
    pub current: PaymentStatus,
    /// The status just moved to "Payé": time for the confirmation email.
    pub became_paid: bool,
}

/// Merges a payment update into the licensee.
///
/// `amount_paid` is only kept while the resulting status is `Partiel`.
pub fn apply_payment_update(licensee: &mut Licensee, update: PaymentUpdate) -> PaymentTransition {
    let previous = licensee.payment_status;

    if let Some(status) = update.payment_status {
        licensee.payment_status = status;
    }
    if let Some(method) = update.payment_method {
        licensee.payment_method = Some(method);
    }
    if let Some(date) = update.payment_date {
        licensee.payment_date = Some(date);
    }
    if let Some(comment) = update.payment_comment {
        licensee.payment_comment = Some(comment);
    }
    if let Some(reductions) = update.reductions {
        licensee.reductions = reductions;
    }
    if let Some(amount) = update.amount_paid {
        licensee.amount_paid = Some(amount);
    }

    if licensee.payment_status != PaymentStatus::Partial {
        licensee.amount_paid = None;
    }

    let current = licensee.payment_status;
    PaymentTransition {
        previous,
        current,
        became_paid: current == PaymentStatus::Paid && previous != PaymentStatus::Paid,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{licensee, pack};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn adult_form() -> RegistrationForm {
        RegistrationForm {
            last_name: "Durand".to_string(),
            first_name: "Hugo".to_string(),
            sex: Sex::Male,
            date_of_birth: date(1990, 1, 20),
            place_of_birth: Some("Nantes".to_string()),
            born_abroad: false,
            licensee_category_id: "lc-seniors-g".to_string(),
            pack_id: "pack-1".to_string(),
            phone: "0601020304".to_string(),
            email: "hugo@example.com".to_string(),
            legal_representative: None,
        }
    }

    fn complete_representative() -> LegalRepresentativeForm {
        LegalRepresentativeForm {
            last_name: Some("Martin".to_string()),
            first_name: Some("Paul".to_string()),
            date_of_birth: Some(date(1985, 6, 1)),
            place_of_birth: Some("Lyon".to_string()),
            born_abroad: None,
            email: Some("paul.martin@example.com".to_string()),
            father_phone: Some("0611223344".to_string()),
            mother_phone: None,
        }
    }

    #[test]
    fn test_adult_form_is_valid_without_representative() {
        assert!(validate_registration(&adult_form(), date(2025, 9, 1)).is_ok());
    }

    #[test]
    fn test_form_reports_every_field() {
        let form = RegistrationForm {
            last_name: "D".to_string(),
            first_name: String::new(),
            phone: "0601".to_string(),
            email: "not-an-email".to_string(),
            pack_id: String::new(),
            ..adult_form()
        };
        let errors = validate_registration(&form, date(2025, 9, 1)).unwrap_err();
        for field in ["lastName", "firstName", "phone", "email", "packId"] {
            assert!(errors.has_field(field), "missing error for {field}");
        }
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_minor_requires_representative() {
        let form = RegistrationForm {
            date_of_birth: date(2015, 3, 12),
            ..adult_form()
        };
        let errors = validate_registration(&form, date(2025, 9, 1)).unwrap_err();
        assert!(errors.has_field("legalRepresentative.lastName"));
        assert!(errors.has_field("legalRepresentative.dateOfBirth"));
        assert!(errors.has_field("legalRepresentative.fatherPhone"));

        let form = RegistrationForm {
            legal_representative: Some(complete_representative()),
            ..form
        };
        assert!(validate_registration(&form, date(2025, 9, 1)).is_ok());
    }

    #[test]
    fn test_one_parent_phone_is_enough() {
        let rep = LegalRepresentativeForm {
            father_phone: None,
            mother_phone: Some("0655667788".to_string()),
            ..complete_representative()
        };
        let form = RegistrationForm {
            date_of_birth: date(2012, 1, 1),
            legal_representative: Some(rep),
            ..adult_form()
        };
        assert!(validate_registration(&form, date(2025, 9, 1)).is_ok());
    }

    #[test]
    fn test_minor_check_uses_frozen_date() {
        let form = RegistrationForm {
            date_of_birth: date(2007, 9, 2),
            ..adult_form()
        };
        // 17 the day before the birthday, 18 on it
        assert!(validate_registration(&form, date(2025, 9, 1)).is_err());
        assert!(validate_registration(&form, date(2025, 9, 2)).is_ok());
    }

    #[test]
    fn test_register_builds_pending_licensee() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 9, 30, 0).unwrap();
        let form = RegistrationForm {
            date_of_birth: date(2015, 3, 12),
            legal_representative: Some(complete_representative()),
            ..adult_form()
        };
        let lic = register(form, "lic-test".to_string(), now).unwrap();
        assert_eq!(lic.id, "lic-test");
        assert_eq!(lic.registration_date, now);
        assert_eq!(lic.payment_status, PaymentStatus::Pending);
        assert_eq!(lic.equipment_status, EquipmentStatus::Pending);
        assert!(lic.reductions.is_empty() && lic.assigned_equipment.is_empty());
        let rep = lic.legal_representative.unwrap();
        assert_eq!(rep.first_name, "Paul");
        assert!(!rep.born_abroad);
    }

    #[test]
    fn test_register_drops_partial_representative_of_adult() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 9, 30, 0).unwrap();
        let form = RegistrationForm {
            legal_representative: Some(LegalRepresentativeForm {
                last_name: Some("Durand".to_string()),
                ..Default::default()
            }),
            ..adult_form()
        };
        let lic = register(form, new_licensee_id(), now).unwrap();
        assert!(lic.legal_representative.is_none());
        assert!(lic.id.starts_with("lic-"));
    }

    #[test]
    fn test_suggest_category() {
        let categories = vec![LicenseeCategory {
            id: "lc-seniors-g".to_string(),
            name: "SENIORS G".to_string(),
            description: "Né avant ou en 2007".to_string(),
            color: String::new(),
        }];
        assert_eq!(suggest_category(&adult_form(), &categories), Some("lc-seniors-g"));
    }

    fn import_row() -> ImportRow {
        ImportRow {
            first_name: " Léa ".to_string(),
            last_name: "Martin".to_string(),
            sex: "Female".to_string(),
            date_of_birth: "2015-03-12".to_string(),
            born_abroad: "FALSE".to_string(),
            phone: "0601020304".to_string(),
            email: "famille.martin@example.com".to_string(),
            licensee_category_name: "U10-U11 F".to_string(),
            pack_name: "Pack pack-1".to_string(),
            rep_first_name: "Paul".to_string(),
            rep_last_name: "Martin".to_string(),
            rep_date_of_birth: "1985-06-01".to_string(),
            rep_place_of_birth: "Lyon".to_string(),
            rep_born_abroad: "true".to_string(),
            rep_email: "paul.martin@example.com".to_string(),
            rep_father_phone: "0611223344".to_string(),
            ..Default::default()
        }
    }

    fn import_catalogs() -> (Vec<Pack>, Vec<LicenseeCategory>) {
        let packs = vec![pack("pack-1", 150, &["Maillot"])];
        let categories = vec![LicenseeCategory {
            id: "lc-u10f".to_string(),
            name: "U10-U11 F".to_string(),
            description: String::new(),
            color: String::new(),
        }];
        (packs, categories)
    }

    #[test]
    fn test_import_row_resolves_names() {
        let (packs, categories) = import_catalogs();
        let form = validate_import_row(&import_row(), &packs, &categories, date(2025, 9, 1)).unwrap();
        assert_eq!(form.first_name, "Léa");
        assert_eq!(form.sex, Sex::Female);
        assert_eq!(form.pack_id, "pack-1");
        assert_eq!(form.licensee_category_id, "lc-u10f");
        assert!(!form.born_abroad);
        let rep = form.legal_representative.unwrap();
        assert_eq!(rep.born_abroad, Some(true));
        assert_eq!(rep.mother_phone, None);
    }

    #[test]
    fn test_import_row_errors() {
        let (packs, categories) = import_catalogs();
        let row = ImportRow {
            sex: "x".to_string(),
            date_of_birth: "12/03/2015".to_string(),
            pack_name: "Pack inconnu".to_string(),
            licensee_category_name: String::new(),
            ..import_row()
        };
        let errors = validate_import_row(&row, &packs, &categories, date(2025, 9, 1)).unwrap_err();
        for field in ["sex", "dateOfBirth", "packName", "licenseeCategoryName"] {
            assert!(errors.has_field(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_import_row_minor_needs_representative() {
        let (packs, categories) = import_catalogs();
        let row = ImportRow {
            rep_first_name: String::new(),
            rep_email: "paul".to_string(),
            rep_date_of_birth: String::new(),
            ..import_row()
        };
        let errors = validate_import_row(&row, &packs, &categories, date(2025, 9, 1)).unwrap_err();
        assert!(errors.has_field("repFirstName"));
        assert!(errors.has_field("repEmail"));
        assert!(errors.has_field("repDateOfBirth"));

        // An adult row ignores the representative columns
        let row = ImportRow {
            date_of_birth: "1990-01-20".to_string(),
            ..row
        };
        let form = validate_import_row(&row, &packs, &categories, date(2025, 9, 1)).unwrap();
        assert!(form.legal_representative.is_none());
    }

    #[test]
    fn test_payment_update_clears_amount_unless_partial() {
        let mut lic = licensee("a");
        let t = apply_payment_update(
            &mut lic,
            PaymentUpdate {
                payment_status: Some(PaymentStatus::Partial),
                amount_paid: Some(Money::from_euros(40, 0)),
                ..Default::default()
            },
        );
        assert!(!t.became_paid);
        assert_eq!(lic.amount_paid, Some(Money::from_euros(40, 0)));

        let t = apply_payment_update(
            &mut lic,
            PaymentUpdate {
                payment_status: Some(PaymentStatus::Paid),
                payment_method: Some(PaymentMethod::Card),
                amount_paid: Some(Money::from_euros(40, 0)),
                ..Default::default()
            },
        );
        assert!(t.became_paid);
        assert_eq!(t.previous, PaymentStatus::Partial);
        assert_eq!(lic.amount_paid, None);
        assert_eq!(lic.payment_method, Some(PaymentMethod::Card));
    }

    #[test]
    fn test_paid_again_does_not_trigger() {
        let mut lic = licensee("a");
        lic.payment_status = PaymentStatus::Paid;
        let t = apply_payment_update(
            &mut lic,
            PaymentUpdate {
                payment_status: Some(PaymentStatus::Paid),
                payment_comment: Some("chèque encaissé".to_string()),
                ..Default::default()
            },
        );
        assert!(!t.became_paid);
        assert_eq!(lic.payment_comment.as_deref(), Some("chèque encaissé"));
    }

    #[test]
    fn test_payment_update_reads_json() {
        let json = r#"{
            "paymentStatus": "Payé",
            "paymentMethod": "Virement",
            "paymentDate": "2025-09-03",
            "reductions": [{ "id": "red-1" }]
        }"#;
        let update: PaymentUpdate = serde_json::from_str(json).unwrap();
        let mut lic = licensee("a");
        let t = apply_payment_update(&mut lic, update);
        assert!(t.became_paid);
        assert_eq!(lic.payment_date, Some(date(2025, 9, 3)));
        assert_eq!(lic.reductions.len(), 1);
    }
}
