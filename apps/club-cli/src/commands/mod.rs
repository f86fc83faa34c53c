//! Command implementations.
//!
//! Every command writes to the given writer, either as text for a person
//! or as JSON (`--json`) for scripts.

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

pub mod assign;
pub mod categories;
pub mod email;
pub mod matching;
pub mod price;
pub mod stock;
pub mod validate;

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory snapshot shared by the command tests.

    use chrono::NaiveDate;

    use club_core::category::with_season_descriptions;
    use club_core::{
        AppSettings, AssignedEquipment, ClubInfo, EmailTemplate, EmailTemplates,
        EquipmentCategory, EquipmentItem, EquipmentStatus, Licensee, LicenseeCategory, Money,
        Multiplier, Pack, PaymentStatus, Reduction, Size, StockEntry,
    };

    use crate::snapshot::Snapshot;

    fn licensee(id: &str, json: &str) -> Licensee {
        let mut lic: Licensee = serde_json::from_str(json).unwrap();
        lic.id = id.to_string();
        lic
    }

    pub fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    /// Season 2026, one pack, two licensees:
    /// - `lic-paid`: paid, waiting for equipment, half-price + 10 € voucher
    /// - `lic-holder`: already holds the last Maillot M
    pub fn snapshot() -> Snapshot {
        let base = r#"{
            "id": "x", "lastName": "Martin", "firstName": "Léa", "sex": "female",
            "dateOfBirth": "2016-03-12", "licenseeCategoryId": "lc-u10f", "packId": "pack-1",
            "phone": "0601020304", "email": "lea@example.com",
            "registrationDate": "2025-09-01T08:00:00Z"
        }"#;

        let mut paid = licensee("lic-paid", base);
        paid.payment_status = PaymentStatus::Paid;
        paid.reductions = vec![
            club_core::AppliedReduction::new("half"),
            club_core::AppliedReduction::new("voucher"),
        ];

        let mut holder = licensee("lic-holder", base);
        holder.first_name = "Hugo".to_string();
        holder.payment_status = PaymentStatus::Paid;
        holder.equipment_status = EquipmentStatus::Assigned;
        holder.assigned_equipment = vec![AssignedEquipment {
            name: "Maillot".to_string(),
            size: "M".to_string(),
            out_of_stock: false,
        }];

        let raw_categories = vec![
            LicenseeCategory {
                id: "lc-u10f".to_string(),
                name: "U10-U11 F".to_string(),
                description: String::new(),
                color: "#db2777".to_string(),
            },
            LicenseeCategory {
                id: "lc-loisirs".to_string(),
                name: "Loisirs".to_string(),
                description: "Adultes, le mardi".to_string(),
                color: "#64748b".to_string(),
            },
        ];

        let size = |name: &str| Size {
            id: format!("s-{name}"),
            name: name.to_string(),
        };

        Snapshot {
            licensees: vec![paid, holder],
            packs: vec![Pack {
                id: "pack-1".to_string(),
                name: "Pack Jeune".to_string(),
                price: Money::from_euros(100, 0),
                composition: vec!["Maillot".to_string(), "Short".to_string()],
            }],
            licensee_categories: with_season_descriptions(&raw_categories, 2026),
            settings: AppSettings {
                reference_season: 2026,
                reductions: vec![
                    Reduction {
                        id: "half".to_string(),
                        name: "Deuxième enfant".to_string(),
                        amount: Money::zero(),
                        note: None,
                        multiplier: Some(Multiplier::from_bps(5000)),
                    },
                    Reduction {
                        id: "voucher".to_string(),
                        name: "Bon CAF".to_string(),
                        amount: Money::from_euros(10, 0),
                        note: None,
                        multiplier: None,
                    },
                ],
                club_info: ClubInfo::default(),
            },
            stock: vec![
                StockEntry {
                    equipment_name: "Maillot".to_string(),
                    size_name: "M".to_string(),
                    quantity: 1,
                    last_modified: None,
                },
                StockEntry {
                    equipment_name: "Short".to_string(),
                    size_name: "S".to_string(),
                    quantity: 12,
                    last_modified: None,
                },
            ],
            equipment: vec![
                EquipmentItem {
                    id: "eq-1".to_string(),
                    name: "Maillot".to_string(),
                    category: "cat-textile".to_string(),
                    reference_adulte: None,
                    reference_enfant: None,
                },
                EquipmentItem {
                    id: "eq-2".to_string(),
                    name: "Short".to_string(),
                    category: "cat-textile".to_string(),
                    reference_adulte: None,
                    reference_enfant: None,
                },
            ],
            equipment_categories: vec![EquipmentCategory {
                id: "cat-textile".to_string(),
                name: "Textile".to_string(),
                sizes: vec![size("S"), size("M")],
            }],
            email_templates: EmailTemplates {
                payment_confirmation: EmailTemplate {
                    subject: "Paiement reçu".to_string(),
                    body: "Bonjour {{recipientName}}, {{finalPrice}} € ({{packName}})".to_string(),
                },
                equipment_complete: EmailTemplate {
                    subject: "Équipement".to_string(),
                    body: "{{equipmentList}}".to_string(),
                },
                equipment_incomplete: EmailTemplate {
                    subject: "Équipement incomplet".to_string(),
                    body: "{{equipmentList}}".to_string(),
                },
            },
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
