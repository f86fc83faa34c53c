//! # club-core: Pure Business Logic for Club Licence Management
//!
//! This crate holds the rules of a football club's licensee registrations:
//! which category a player belongs to, what they owe, and what equipment
//! can be handed out. Everything here is a pure function over in-memory
//! data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Club Licence Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               JSON snapshot (licensees, packs, stock...)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ tokio::fs, read-only                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    club-cli (operator commands)                 │   │
//! │  │    categories, match, price, stock, assign, validate, email    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ club-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │ category │ │ pricing  │ │  stock   │ │    equipment     │  │   │
//! │  │   │ matching │ │ final    │ │ available│ │    assignment    │  │   │
//! │  │   │ seasons  │ │ price    │ │ ledger   │ │    cascades      │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │   ┌──────────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐  │   │
//! │  │   │ registration │ │ template │ │  money   │ │  validation  │  │   │
//! │  │   └──────────────┘ └──────────┘ └──────────┘ └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Licensee, Pack, Reduction, StockEntry, etc.)
//! - [`money`] - Money in integer cents and reduction multipliers
//! - [`category`] - Season descriptions and category matching
//! - [`pricing`] - Final price and amount still due
//! - [`stock`] - Available stock derived from assignments
//! - [`equipment`] - Assignment policy and catalog cascades
//! - [`registration`] - Form and import rules, payment updates
//! - [`template`] - Email composition
//! - [`validation`] - Field validators
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot in, same answer out
//! 2. **No Clock**: "today" and "now" are always parameters
//! 3. **Integer Money**: amounts are cents, multipliers basis points
//! 4. **Drift Tolerance**: dangling references and negative stock are
//!    values, not errors
//!
//! ## Example Usage
//!
//! ```rust
//! use club_core::category::{derive_description, match_category};
//! use club_core::{LicenseeCategory, Sex};
//! use chrono::NaiveDate;
//!
//! let mut u10 = LicenseeCategory {
//!     id: "lc-u10g".into(),
//!     name: "U10-U11 G".into(),
//!     description: String::new(),
//!     color: "#16a34a".into(),
//! };
//! u10.description = derive_description(&u10, 2026);
//!
//! let born = NaiveDate::from_ymd_opt(2016, 5, 4).unwrap();
//! assert_eq!(match_category(born, Sex::Male, &[u10]), Some("lc-u10g"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category;
pub mod equipment;
pub mod error;
pub mod money;
pub mod pricing;
pub mod registration;
pub mod stock;
pub mod template;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use club_core::Money` instead of
// `use club_core::money::Money`

pub use category::{derive_description, match_category};
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::{Money, Multiplier};
pub use pricing::calculate_final_price;
pub use stock::{available_stock, StockLedger};
pub use types::*;
