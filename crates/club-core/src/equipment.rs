//! # Equipment Assignment
//!
//! Handing out the items of a licensee's pack once the registration is paid.
//!
//! ## Assignment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Paid licensee, equipment "En attente" or "Incomplet"                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft_assignments()  one slot per pack item (or previous picks)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  size_options()       sizes without stock are not selectable,           │
//! │       │               unless the operator forces the assignment         │
//! │       ▼                                                                 │
//! │  finalize_assignment()                                                  │
//! │       ├── every item in stock  ──► "Attribué"                           │
//! │       └── any item forced      ──► "Incomplet" (out_of_stock = true)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is checked against a [`StockLedger`] that excludes the licensee
//! being assigned, so re-assigning an incomplete licensee does not count
//! their previous picks against themselves.
//!
//! Packs reference equipment by name, so renaming or deleting an item has
//! to cascade into every pack composition.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError, ValidationErrors};
use crate::stock::StockLedger;
use crate::types::{
    AssignedEquipment, EmailKind, EquipmentCategory, EquipmentItem, EquipmentStatus, Licensee,
    Pack, PaymentStatus, Size,
};

// =============================================================================
// Eligibility and Drafts
// =============================================================================

/// Whether a licensee is waiting for (more) equipment.
pub fn awaiting_assignment(licensee: &Licensee) -> bool {
    licensee.payment_status == PaymentStatus::Paid
        && matches!(
            licensee.equipment_status,
            EquipmentStatus::Pending | EquipmentStatus::Incomplete
        )
}

/// An item with the size picked by the operator (empty while unpicked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    pub size: String,
}

impl Selection {
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Selection {
            name: name.into(),
            size: size.into(),
        }
    }

    pub fn is_picked(&self) -> bool {
        !self.size.trim().is_empty()
    }
}

/// Starting selections for the assignment dialog.
///
/// An incomplete licensee gets their previous picks back; anyone else
/// gets one unpicked slot per pack item.
pub fn draft_assignments(licensee: &Licensee, pack: &Pack) -> Vec<Selection> {
    if licensee.equipment_status == EquipmentStatus::Incomplete
        && !licensee.assigned_equipment.is_empty()
    {
        return licensee
            .assigned_equipment
            .iter()
            .map(|a| Selection::new(a.name.clone(), a.size.clone()))
            .collect();
    }

    pack.composition
        .iter()
        .map(|name| Selection::new(name.clone(), ""))
        .collect()
}

/// Sets `size` on every slot named `name`. A pack may list the same item
/// twice. Returns how many slots changed; 0 means the item is not drafted.
pub fn pick_size(selections: &mut [Selection], name: &str, size: &str) -> usize {
    let mut picked = 0;
    for slot in selections.iter_mut().filter(|s| s.name == name) {
        slot.size = size.to_string();
        picked += 1;
    }
    picked
}

/// The size chart of an item, empty when its category is unknown.
pub fn sizes_for<'a>(item: &EquipmentItem, categories: &'a [EquipmentCategory]) -> &'a [Size] {
    categories
        .iter()
        .find(|c| c.id == item.category)
        .map(|c| c.sizes.as_slice())
        .unwrap_or(&[])
}

// =============================================================================
// Size Options
// =============================================================================

/// One entry of a size picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeOption {
    pub size: String,
    pub available: i64,
    pub in_stock: bool,
    /// Out-of-stock sizes are selectable only when forcing.
    pub selectable: bool,
}

pub fn size_options(
    item_name: &str,
    sizes: &[Size],
    ledger: &StockLedger,
    force: bool,
) -> Vec<SizeOption> {
    sizes
        .iter()
        .map(|size| {
            let available = ledger.available(item_name, &size.name);
            let in_stock = available > 0;
            SizeOption {
                size: size.name.clone(),
                available,
                in_stock,
                selectable: in_stock || force,
            }
        })
        .collect()
}

// =============================================================================
// Finalizing
// =============================================================================

/// The outcome of an assignment, ready to be written on the licensee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub status: EquipmentStatus,
    pub items: Vec<AssignedEquipment>,
}

impl Assignment {
    /// Items recorded while out of stock.
    pub fn missing(&self) -> impl Iterator<Item = &AssignedEquipment> {
        self.items.iter().filter(|a| a.out_of_stock)
    }

    /// The email to send for this outcome.
    pub fn email_kind(&self) -> EmailKind {
        EmailKind::for_equipment(self.status)
    }
}

/// Validates selections against stock and builds the assignment.
///
/// ## Errors
/// - [`CoreError::Invalid`] listing every item without a size
/// - [`CoreError::OutOfStock`] for the first out-of-stock pick when not forcing
pub fn finalize_assignment(
    selections: &[Selection],
    ledger: &StockLedger,
    force: bool,
) -> CoreResult<Assignment> {
    let mut errors = ValidationErrors::new();
    for selection in selections.iter().filter(|s| !s.is_picked()) {
        errors.push(ValidationError::Required {
            field: format!("size.{}", selection.name),
        });
    }
    errors.into_result()?;

    let mut items = Vec::with_capacity(selections.len());
    for selection in selections {
        let size = selection.size.trim();
        let in_stock = ledger.in_stock(&selection.name, size);
        if !in_stock && !force {
            return Err(CoreError::OutOfStock {
                item: selection.name.clone(),
                size: size.to_string(),
            });
        }
        items.push(AssignedEquipment {
            name: selection.name.clone(),
            size: size.to_string(),
            out_of_stock: !in_stock,
        });
    }

    let status = if items.iter().any(|a| a.out_of_stock) {
        EquipmentStatus::Incomplete
    } else {
        EquipmentStatus::Assigned
    };

    Ok(Assignment { status, items })
}

/// Writes an assignment onto the licensee, replacing previous items.
pub fn apply_assignment(licensee: &mut Licensee, assignment: Assignment) {
    licensee.equipment_status = assignment.status;
    licensee.assigned_equipment = assignment.items;
}

// =============================================================================
// Catalog Cascades
// =============================================================================

/// Renames an item in every pack composition. Returns the packs touched.
pub fn rename_equipment(packs: &mut [Pack], old_name: &str, new_name: &str) -> usize {
    if old_name == new_name {
        return 0;
    }

    let mut touched = 0;
    for pack in packs.iter_mut() {
        let mut changed = false;
        for item in pack.composition.iter_mut().filter(|i| i.as_str() == old_name) {
            *item = new_name.to_string();
            changed = true;
        }
        if changed {
            touched += 1;
        }
    }
    touched
}

/// Drops an item from every pack composition. Returns the packs touched.
pub fn remove_equipment(packs: &mut [Pack], name: &str) -> usize {
    let mut touched = 0;
    for pack in packs.iter_mut() {
        let before = pack.composition.len();
        pack.composition.retain(|item| item != name);
        if pack.composition.len() != before {
            touched += 1;
        }
    }
    touched
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{holding, licensee, pack, stock_entry};

    fn size(name: &str) -> Size {
        Size {
            id: format!("s-{name}"),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_awaiting_assignment() {
        let mut lic = licensee("a");
        assert!(!awaiting_assignment(&lic));

        lic.payment_status = PaymentStatus::Paid;
        assert!(awaiting_assignment(&lic));

        lic.equipment_status = EquipmentStatus::Incomplete;
        assert!(awaiting_assignment(&lic));

        lic.equipment_status = EquipmentStatus::Assigned;
        assert!(!awaiting_assignment(&lic));

        lic.payment_status = PaymentStatus::Partial;
        lic.equipment_status = EquipmentStatus::Pending;
        assert!(!awaiting_assignment(&lic));
    }

    #[test]
    fn test_draft_from_pack_composition() {
        let lic = licensee("a");
        let p = pack("pack-1", 150, &["Maillot", "Short", "Chaussettes"]);
        let draft = draft_assignments(&lic, &p);
        assert_eq!(draft.len(), 3);
        assert!(draft.iter().all(|s| !s.is_picked()));
        assert_eq!(draft[1].name, "Short");
    }

    #[test]
    fn test_draft_reuses_previous_picks_when_incomplete() {
        let mut lic = holding("a", &[("Maillot", "M", true), ("Short", "S", false)]);
        lic.equipment_status = EquipmentStatus::Incomplete;
        let p = pack("pack-1", 150, &["Maillot", "Short", "Chaussettes"]);

        let draft = draft_assignments(&lic, &p);
        assert_eq!(draft, vec![Selection::new("Maillot", "M"), Selection::new("Short", "S")]);

        lic.equipment_status = EquipmentStatus::Pending;
        assert_eq!(draft_assignments(&lic, &p).len(), 3);
    }

    #[test]
    fn test_pick_size_updates_every_slot_with_that_name() {
        let lic = licensee("a");
        let p = pack("pack-1", 150, &["Chaussettes", "Maillot", "Chaussettes"]);
        let mut draft = draft_assignments(&lic, &p);

        assert_eq!(pick_size(&mut draft, "Chaussettes", "39-42"), 2);
        assert_eq!(draft[0].size, "39-42");
        assert_eq!(draft[2].size, "39-42");
        assert!(!draft[1].is_picked());

        assert_eq!(pick_size(&mut draft, "Casquette", "TU"), 0);
    }

    #[test]
    fn test_sizes_for_item() {
        let categories = vec![EquipmentCategory {
            id: "cat-textile".to_string(),
            name: "Textile".to_string(),
            sizes: vec![size("S"), size("M")],
        }];
        let item = EquipmentItem {
            id: "eq-1".to_string(),
            name: "Maillot".to_string(),
            category: "cat-textile".to_string(),
            reference_adulte: None,
            reference_enfant: None,
        };
        assert_eq!(sizes_for(&item, &categories).len(), 2);

        let orphan = EquipmentItem {
            category: "cat-gone".to_string(),
            ..item
        };
        assert!(sizes_for(&orphan, &categories).is_empty());
    }

    #[test]
    fn test_size_options_selectable_only_in_stock_unless_forced() {
        let stock = vec![stock_entry("Maillot", "S", 2), stock_entry("Maillot", "M", 0)];
        let ledger = StockLedger::new(&stock, &[]);
        let sizes = vec![size("S"), size("M")];

        let options = size_options("Maillot", &sizes, &ledger, false);
        assert!(options[0].selectable && options[0].in_stock);
        assert!(!options[1].selectable && !options[1].in_stock);

        let forced = size_options("Maillot", &sizes, &ledger, true);
        assert!(forced[1].selectable);
        assert!(!forced[1].in_stock);
    }

    #[test]
    fn test_finalize_all_in_stock_is_assigned() {
        let stock = vec![stock_entry("Maillot", "M", 3), stock_entry("Short", "S", 1)];
        let ledger = StockLedger::new(&stock, &[]);
        let selections = vec![Selection::new("Maillot", "M"), Selection::new("Short", "S")];

        let assignment = finalize_assignment(&selections, &ledger, false).unwrap();
        assert_eq!(assignment.status, EquipmentStatus::Assigned);
        assert!(assignment.items.iter().all(|a| !a.out_of_stock));
        assert_eq!(assignment.email_kind(), EmailKind::EquipmentComplete);
    }

    #[test]
    fn test_finalize_refuses_out_of_stock_without_force() {
        let ledger = StockLedger::new(&[stock_entry("Maillot", "M", 0)], &[]);
        let selections = vec![Selection::new("Maillot", "M")];

        let err = finalize_assignment(&selections, &ledger, false).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { ref item, ref size } if item == "Maillot" && size == "M"));
    }

    #[test]
    fn test_forced_assignment_is_incomplete() {
        let stock = vec![stock_entry("Maillot", "M", 0), stock_entry("Short", "S", 4)];
        let ledger = StockLedger::new(&stock, &[]);
        let selections = vec![Selection::new("Maillot", "M"), Selection::new("Short", "S")];

        let assignment = finalize_assignment(&selections, &ledger, true).unwrap();
        assert_eq!(assignment.status, EquipmentStatus::Incomplete);
        assert_eq!(assignment.missing().count(), 1);
        assert!(assignment.items[0].out_of_stock);
        assert!(!assignment.items[1].out_of_stock);
        assert_eq!(assignment.email_kind(), EmailKind::EquipmentIncomplete);
    }

    #[test]
    fn test_finalize_requires_every_size() {
        let ledger = StockLedger::default();
        let selections = vec![Selection::new("Maillot", ""), Selection::new("Short", " ")];

        match finalize_assignment(&selections, &ledger, true) {
            Err(CoreError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.has_field("size.Maillot"));
            }
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_reassignment_does_not_count_own_items() {
        let mut lic = holding("a", &[("Maillot", "M", false), ("Short", "S", true)]);
        lic.payment_status = PaymentStatus::Paid;
        lic.equipment_status = EquipmentStatus::Incomplete;
        let stock = vec![stock_entry("Maillot", "M", 1), stock_entry("Short", "S", 1)];
        let licensees = vec![lic.clone()];

        let ledger = StockLedger::excluding(&stock, &licensees, &lic.id);
        let draft = draft_assignments(&lic, &pack("pack-1", 150, &["Maillot", "Short"]));
        let assignment = finalize_assignment(&draft, &ledger, false).unwrap();

        apply_assignment(&mut lic, assignment);
        assert_eq!(lic.equipment_status, EquipmentStatus::Assigned);
        assert!(lic.assigned_equipment.iter().all(|a| !a.out_of_stock));
    }

    #[test]
    fn test_rename_cascades_into_packs() {
        let mut packs = vec![
            pack("p1", 150, &["Maillot", "Short"]),
            pack("p2", 90, &["Short"]),
            pack("p3", 60, &["Maillot"]),
        ];
        assert_eq!(rename_equipment(&mut packs, "Maillot", "Maillot domicile"), 2);
        assert_eq!(packs[0].composition, ["Maillot domicile", "Short"]);
        assert_eq!(packs[2].composition, ["Maillot domicile"]);
        assert_eq!(rename_equipment(&mut packs, "Short", "Short"), 0);
    }

    #[test]
    fn test_remove_cascades_into_packs() {
        let mut packs = vec![pack("p1", 150, &["Maillot", "Short"]), pack("p2", 90, &["Sac"])];
        assert_eq!(remove_equipment(&mut packs, "Short"), 1);
        assert_eq!(packs[0].composition, ["Maillot"]);
        assert_eq!(remove_equipment(&mut packs, "Ballon"), 0);
    }
}
