//! # Pricing
//!
//! The amount a licensee owes for a season.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pack price                                   150.00 €                  │
//! │     │                                                                   │
//! │     ├── x multiplier of each applied reduction (applied order)          │
//! │     │      "Deuxième enfant" x0.5  ──►         75.00 €                  │
//! │     │                                                                   │
//! │     ├── - sum of fixed amounts, subtracted ONCE                         │
//! │     │      "Bon CAF" 30 €, "Pass Sport" 50 € ──► -5.00 €               │
//! │     │                                                                   │
//! │     └── floor at zero                          0.00 €                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Applied reductions whose id no longer exists in the catalog are dropped
//! without error: reductions can be deleted from the settings while old
//! registrations still reference them.
//!
//! Every screen, export and email that shows an amount due goes through
//! [`calculate_final_price`] (or [`price_breakdown`], which it wraps).

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Multiplier};
use crate::types::{AppliedReduction, Licensee, Pack, PaymentStatus, Reduction};

// =============================================================================
// Breakdown
// =============================================================================

/// A catalog reduction resolved for one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReduction {
    pub id: String,
    pub name: String,
    pub amount: Money,
    pub multiplier: Multiplier,
    /// Note attached when the reduction was applied, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ResolvedReduction {
    fn resolve(applied: &AppliedReduction, reduction: &Reduction) -> Self {
        ResolvedReduction {
            id: reduction.id.clone(),
            name: reduction.name.clone(),
            amount: reduction.amount,
            multiplier: reduction.multiplier(),
            note: applied.note.clone(),
        }
    }

    /// Short label for listings: `-10.00 €`, `x0.5`, or both.
    pub fn label(&self) -> String {
        match (self.multiplier.is_one(), self.amount.is_zero()) {
            (true, _) => format!("-{}", self.amount),
            (false, true) => self.multiplier.to_string(),
            (false, false) => format!("{} -{}", self.multiplier, self.amount),
        }
    }
}

/// Every intermediate step of a price calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: Money,
    pub after_multipliers: Money,
    pub fixed_total: Money,
    pub final_price: Money,
    pub applied: Vec<ResolvedReduction>,
    /// Applied ids with no catalog entry (ignored in the price).
    pub dangling: Vec<String>,
}

/// Computes the full breakdown of a price.
pub fn price_breakdown(
    pack_price: Money,
    applied: &[AppliedReduction],
    catalog: &[Reduction],
) -> PriceBreakdown {
    let mut resolved = Vec::with_capacity(applied.len());
    let mut dangling = Vec::new();

    for reduction in applied {
        match catalog.iter().find(|r| r.id == reduction.id) {
            Some(entry) => resolved.push(ResolvedReduction::resolve(reduction, entry)),
            None => dangling.push(reduction.id.clone()),
        }
    }

    let after_multipliers = resolved
        .iter()
        .fold(pack_price, |price, r| price.apply_multiplier(r.multiplier));
    let fixed_total: Money = resolved.iter().map(|r| r.amount).sum();
    let final_price = (after_multipliers - fixed_total).max_zero();

    PriceBreakdown {
        base: pack_price,
        after_multipliers,
        fixed_total,
        final_price,
        applied: resolved,
        dangling,
    }
}

/// The amount due for a pack with the given reductions applied.
///
/// ```rust
/// use club_core::money::{Money, Multiplier};
/// use club_core::pricing::calculate_final_price;
/// use club_core::{AppliedReduction, Reduction};
///
/// let catalog = vec![Reduction {
///     id: "r1".into(),
///     name: "Bon CAF".into(),
///     amount: Money::from_euros(80, 0),
///     note: None,
///     multiplier: Some(Multiplier::ONE),
/// }];
/// let price = calculate_final_price(
///     Money::from_euros(50, 0),
///     &[AppliedReduction::new("r1")],
///     &catalog,
/// );
/// assert_eq!(price, Money::zero());
/// ```
pub fn calculate_final_price(
    pack_price: Money,
    applied: &[AppliedReduction],
    catalog: &[Reduction],
) -> Money {
    price_breakdown(pack_price, applied, catalog).final_price
}

// =============================================================================
// Licensee Helpers
// =============================================================================

/// Breakdown for a licensee, looking their pack up by id.
pub fn licensee_breakdown(
    licensee: &Licensee,
    packs: &[Pack],
    catalog: &[Reduction],
) -> CoreResult<PriceBreakdown> {
    let pack = packs
        .iter()
        .find(|p| p.id == licensee.pack_id)
        .ok_or_else(|| CoreError::PackNotFound(licensee.pack_id.clone()))?;

    Ok(price_breakdown(pack.price, &licensee.reductions, catalog))
}

/// Final price for a licensee.
pub fn licensee_price(
    licensee: &Licensee,
    packs: &[Pack],
    catalog: &[Reduction],
) -> CoreResult<Money> {
    licensee_breakdown(licensee, packs, catalog).map(|b| b.final_price)
}

/// What is still owed given the payment status.
///
/// `amount_paid` only counts for a partial payment; a missing amount is
/// treated as nothing paid yet.
pub fn remaining_due(
    final_price: Money,
    status: PaymentStatus,
    amount_paid: Option<Money>,
) -> Money {
    match status {
        PaymentStatus::Paid => Money::zero(),
        PaymentStatus::Partial => (final_price - amount_paid.unwrap_or_default()).max_zero(),
        PaymentStatus::Pending => final_price.max_zero(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
