//! Shared builders for unit tests.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::money::Money;
use crate::types::{
    AssignedEquipment, EquipmentStatus, Licensee, Pack, PaymentStatus, Sex, StockEntry,
};

/// A paid-nothing, equipment-pending licensee born 2015-03-12.
pub fn licensee(id: &str) -> Licensee {
    Licensee {
        id: id.to_string(),
        last_name: "Martin".to_string(),
        first_name: "Léa".to_string(),
        sex: Sex::Female,
        date_of_birth: NaiveDate::from_ymd_opt(2015, 3, 12).unwrap(),
        place_of_birth: "Lyon".to_string(),
        born_abroad: false,
        licensee_category_id: "lc-1".to_string(),
        pack_id: "pack-1".to_string(),
        phone: "0601020304".to_string(),
        email: "lea@example.com".to_string(),
        registration_date: Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
        payment_status: PaymentStatus::Pending,
        payment_method: None,
        payment_date: None,
        amount_paid: None,
        payment_comment: None,
        reductions: vec![],
        equipment_status: EquipmentStatus::Pending,
        assigned_equipment: vec![],
        legal_representative: None,
    }
}

/// A licensee holding `(item, size, out_of_stock)` assignments.
pub fn holding(id: &str, items: &[(&str, &str, bool)]) -> Licensee {
    let mut lic = licensee(id);
    lic.assigned_equipment = items
        .iter()
        .map(|(name, size, out)| AssignedEquipment {
            name: name.to_string(),
            size: size.to_string(),
            out_of_stock: *out,
        })
        .collect();
    lic
}

pub fn stock_entry(item: &str, size: &str, quantity: i64) -> StockEntry {
    StockEntry {
        equipment_name: item.to_string(),
        size_name: size.to_string(),
        quantity,
        last_modified: None,
    }
}

pub fn pack(id: &str, euros: i64, composition: &[&str]) -> Pack {
    Pack {
        id: id.to_string(),
        name: format!("Pack {id}"),
        price: Money::from_euros(euros, 0),
        composition: composition.iter().map(|s| s.to_string()).collect(),
    }
}
