//! # Stock
//!
//! Available stock is never stored: it is derived every time from the
//! managed quantities and the full set of licensee assignments.
//!
//! ```text
//! ┌──────────────────────┐      ┌─────────────────────────────────────────┐
//! │ StockEntry           │      │ Licensee.assigned_equipment             │
//! │ Maillot / M  qty 5   │      │ Léa   Maillot M  out_of_stock: false  ✔ │
//! └──────────┬───────────┘      │ Hugo  Maillot M  out_of_stock: true   ✘ │
//!            │                  └──────────────────┬──────────────────────┘
//!            │ managed = 5                         │ assigned = 1
//!            └───────────────► available = 5 - 1 = 4 ◄┘
//! ```
//!
//! Forced assignments (`out_of_stock: true`) are known to exceed supply
//! and never count against the managed quantity. Available stock may be
//! negative when more items were handed out than the managed count says.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Licensee, StockEntry};

/// At or below this many available items the level is critical.
pub const CRITICAL_THRESHOLD: i64 = 5;

/// At or below this many available items the level is low.
pub const LOW_THRESHOLD: i64 = 10;

// =============================================================================
// Single Lookups
// =============================================================================

/// Managed quantity of an item/size, 0 when no entry exists.
pub fn managed_quantity(equipment: &str, size: &str, stock: &[StockEntry]) -> i64 {
    stock
        .iter()
        .find(|e| e.equipment_name == equipment && e.size_name == size)
        .map(|e| e.quantity)
        .unwrap_or(0)
}

/// Number of licensees holding a counted assignment of `equipment` in `size`.
pub fn assigned_count(equipment: &str, size: &str, licensees: &[Licensee]) -> i64 {
    licensees
        .iter()
        .filter(|l| l.holds_counted(equipment, size))
        .count() as i64
}

/// Managed quantity minus counted assignments. May be negative.
pub fn available_stock(
    equipment: &str,
    size: &str,
    stock: &[StockEntry],
    licensees: &[Licensee],
) -> i64 {
    managed_quantity(equipment, size, stock) - assigned_count(equipment, size, licensees)
}

// =============================================================================
// Stock Info
// =============================================================================

/// Alert level of an item/size, from its available count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Critical,
    Low,
    Ok,
}

impl StockLevel {
    pub fn from_available(available: i64) -> Self {
        if available <= CRITICAL_THRESHOLD {
            StockLevel::Critical
        } else if available <= LOW_THRESHOLD {
            StockLevel::Low
        } else {
            StockLevel::Ok
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Low => "low",
            StockLevel::Ok => "ok",
        }
    }
}

/// Stock figures for one item/size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    pub managed: i64,
    pub assigned: i64,
    pub available: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl StockInfo {
    pub fn level(&self) -> StockLevel {
        StockLevel::from_available(self.available)
    }
}

pub fn stock_info(
    equipment: &str,
    size: &str,
    stock: &[StockEntry],
    licensees: &[Licensee],
) -> StockInfo {
    let entry = stock
        .iter()
        .find(|e| e.equipment_name == equipment && e.size_name == size);
    let managed = entry.map(|e| e.quantity).unwrap_or(0);
    let assigned = assigned_count(equipment, size, licensees);

    StockInfo {
        managed,
        assigned,
        available: managed - assigned,
        last_modified: entry.and_then(|e| e.last_modified),
    }
}

/// Most recent modification time across all stock entries.
pub fn latest_update(stock: &[StockEntry]) -> Option<DateTime<Utc>> {
    stock.iter().filter_map(|e| e.last_modified).max()
}

// =============================================================================
// Stock Ledger
// =============================================================================

type Key = (String, String);

fn key(equipment: &str, size: &str) -> Key {
    (equipment.to_string(), size.to_string())
}

/// Availability for many item/size pairs at once.
///
/// Built from a snapshot in one pass over the licensees. A ledger is a
/// value: after any change to stock or assignments, build a new one.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    managed: HashMap<Key, i64>,
    assigned: HashMap<Key, i64>,
}

impl StockLedger {
    pub fn new(stock: &[StockEntry], licensees: &[Licensee]) -> Self {
        Self::build(stock, licensees, None)
    }

    /// Ledger that ignores the current assignments of one licensee, used
    /// while that licensee's equipment is being (re)assigned.
    pub fn excluding(stock: &[StockEntry], licensees: &[Licensee], licensee_id: &str) -> Self {
        Self::build(stock, licensees, Some(licensee_id))
    }

    fn build(stock: &[StockEntry], licensees: &[Licensee], excluded: Option<&str>) -> Self {
        let mut managed = HashMap::with_capacity(stock.len());
        for entry in stock {
            // first entry wins, same as a linear lookup
            managed
                .entry(key(&entry.equipment_name, &entry.size_name))
                .or_insert(entry.quantity);
        }

        let mut assigned: HashMap<Key, i64> = HashMap::new();
        for licensee in licensees {
            if excluded == Some(licensee.id.as_str()) {
                continue;
            }
            // a licensee counts once per item/size
            let held: HashSet<(&str, &str)> = licensee
                .assigned_equipment
                .iter()
                .filter(|a| !a.out_of_stock)
                .map(|a| (a.name.as_str(), a.size.as_str()))
                .collect();
            for (name, size) in held {
                *assigned.entry(key(name, size)).or_insert(0) += 1;
            }
        }

        StockLedger { managed, assigned }
    }

    pub fn managed(&self, equipment: &str, size: &str) -> i64 {
        self.managed.get(&key(equipment, size)).copied().unwrap_or(0)
    }

    pub fn assigned(&self, equipment: &str, size: &str) -> i64 {
        self.assigned.get(&key(equipment, size)).copied().unwrap_or(0)
    }

    pub fn available(&self, equipment: &str, size: &str) -> i64 {
        self.managed(equipment, size) - self.assigned(equipment, size)
    }

    /// At least one item can be handed out.
    pub fn in_stock(&self, equipment: &str, size: &str) -> bool {
        self.available(equipment, size) > 0
    }
}

// =============================================================================
// Managed Quantity Updates
// =============================================================================

/// Sets the managed quantity of an item/size, creating the entry if
/// needed. Negative input is clamped to 0. Returns the stored quantity.
pub fn set_managed_quantity(
    stock: &mut Vec<StockEntry>,
    equipment: &str,
    size: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> i64 {
    let quantity = quantity.max(0);

    match stock
        .iter_mut()
        .find(|e| e.equipment_name == equipment && e.size_name == size)
    {
        Some(entry) => {
            entry.quantity = quantity;
            entry.last_modified = Some(now);
        }
        None => stock.push(StockEntry {
            equipment_name: equipment.to_string(),
            size_name: size.to_string(),
            quantity,
            last_modified: Some(now),
        }),
    }

    quantity
}

// =============================================================================
// Unit Tests
// =============================================================================
