//! # Money Module
//!
//! Provides the `Money` type for pack prices, reductions and payments, and
//! the `Multiplier` type for proportional reductions.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Pack 150 € with a x0.7 family reduction and a 12.30 € voucher:        │
//! │    150 * 0.7 - 12.3 = 92.69999999999999  ❌                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    15000 cents * 7000 bps / 10000 = 10500 cents                        │
//! │    10500 - 1230 = 9270 cents = 92.70 €  ✅                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The web application stores amounts as decimal euro numbers (`150`,
//! `12.3`) and multipliers as plain factors (`0.5`). Both types serialize
//! to exactly that shape; the conversion to cents / basis points happens
//! only in the serde impls below.
//!
//! ## Usage
//! ```rust
//! use club_core::money::{Money, Multiplier};
//!
//! let price = Money::from_euros(150, 0);
//! let half = price.apply_multiplier(Multiplier::from_bps(5000));
//! assert_eq!(half.cents(), 7500);
//! assert_eq!(half.to_string(), "75.00 €");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in euro cents.
///
/// ## Where Money is Used
/// ```text
/// Pack.price ──► calculate_final_price ──► amount due ──┬──► payment screen
///                        ▲                              ├──► exports
/// Reduction.amount ──────┘                              └──► confirmation email
/// ```
///
/// Fields of this type carry `#[ts(type = "number")]` in exported structs,
/// matching the decimal euro wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from euros and cents.
    ///
    /// ```rust
    /// use club_core::money::Money;
    ///
    /// assert_eq!(Money::from_euros(12, 30).cents(), 1230);
    /// assert_eq!(Money::from_euros(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_euros(euros: i64, cents: i64) -> Self {
        if euros < 0 {
            Money(euros * 100 - cents)
        } else {
            Money(euros * 100 + cents)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole euro part (truncated towards zero).
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents part (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero. An amount due never goes below 0.
    #[inline]
    pub const fn max_zero(self) -> Self {
        if self.is_negative() {
            Money(0)
        } else {
            self
        }
    }

    /// Scales the amount by a multiplier, rounding half away from zero to
    /// the nearest cent.
    ///
    /// ```rust
    /// use club_core::money::{Money, Multiplier};
    ///
    /// // 33.33 € × 0.5 = 16.665 € → 16.67 €
    /// let scaled = Money::from_cents(3333).apply_multiplier(Multiplier::from_bps(5000));
    /// assert_eq!(scaled.cents(), 1667);
    /// ```
    pub fn apply_multiplier(&self, multiplier: Multiplier) -> Money {
        // i128: cents * bps can exceed i64 for absurd values
        let product = self.0 as i128 * multiplier.bps() as i128;
        let half = (Multiplier::ONE_BPS / 2) as i128;
        let rounded = if product < 0 {
            (product - half) / Multiplier::ONE_BPS as i128
        } else {
            (product + half) / Multiplier::ONE_BPS as i128
        };
        Money(rounded as i64)
    }

    /// Renders the amount with two decimals and no currency sign
    /// (`"40.00"`), the format used in email placeholders.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} €", self.to_decimal_string())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// -----------------------------------------------------------------------------
// Serde: decimal euros on the wire
// -----------------------------------------------------------------------------

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EurosVisitor;

        impl Visitor<'_> for EurosVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an amount in euros")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(100)
                    .map(Money)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(Money)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                if !v.is_finite() {
                    return Err(E::custom("amount must be a finite number"));
                }
                Ok(Money((v * 100.0).round() as i64))
            }
        }

        deserializer.deserialize_any(EurosVisitor)
    }
}

// =============================================================================
// Multiplier
// =============================================================================

/// A proportional price factor in basis points (10000 = ×1.0).
///
/// Reductions such as "second child: half price" carry a multiplier of
/// `0.5`, stored here as 5000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u32);

impl Multiplier {
    /// Basis points of the neutral factor.
    pub const ONE_BPS: u32 = 10_000;

    /// The neutral factor ×1.
    pub const ONE: Multiplier = Multiplier(Self::ONE_BPS);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Multiplier(bps)
    }

    /// Converts a plain factor (`0.5`). Negative factors clamp to zero.
    pub fn from_factor(factor: f64) -> Self {
        Multiplier((factor.max(0.0) * Self::ONE_BPS as f64).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The factor for display only (`0.5`).
    #[inline]
    pub fn factor(&self) -> f64 {
        self.0 as f64 / Self::ONE_BPS as f64
    }

    #[inline]
    pub const fn is_one(&self) -> bool {
        self.0 == Self::ONE_BPS
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.factor())
    }
}

impl Serialize for Multiplier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.factor())
    }
}

impl<'de> Deserialize<'de> for Multiplier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let factor = f64::deserialize(deserializer)?;
        if !factor.is_finite() {
            return Err(de::Error::custom("multiplier must be a finite number"));
        }
        Ok(Multiplier::from_factor(factor))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_euros() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.euros(), 10);
        assert_eq!(money.cents_part(), 99);

        assert_eq!(Money::from_euros(10, 99), money);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(4000).to_string(), "40.00 €");
        assert_eq!(Money::from_cents(505).to_string(), "5.05 €");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50 €");
        assert_eq!(Money::zero().to_decimal_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);
        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 1500);
    }

    #[test]
    fn test_max_zero() {
        assert_eq!(Money::from_cents(-3000).max_zero(), Money::zero());
        assert_eq!(Money::from_cents(120).max_zero().cents(), 120);
    }

    #[test]
    fn test_apply_multiplier_rounds_half_away_from_zero() {
        let half = Multiplier::from_bps(5000);
        assert_eq!(Money::from_cents(10000).apply_multiplier(half).cents(), 5000);
        assert_eq!(Money::from_cents(3333).apply_multiplier(half).cents(), 1667);
        assert_eq!(Money::from_cents(-3333).apply_multiplier(half).cents(), -1667);
        assert_eq!(
            Money::from_cents(4321).apply_multiplier(Multiplier::ONE).cents(),
            4321
        );
    }

    #[test]
    fn test_money_serde_uses_decimal_euros() {
        let m: Money = serde_json::from_str("150").unwrap();
        assert_eq!(m.cents(), 15000);
        let m: Money = serde_json::from_str("12.3").unwrap();
        assert_eq!(m.cents(), 1230);
        let m: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(m.cents(), 10);

        assert_eq!(serde_json::to_string(&Money::from_cents(15000)).unwrap(), "150");
        assert_eq!(serde_json::to_string(&Money::from_cents(1250)).unwrap(), "12.5");
    }

    #[test]
    fn test_money_serde_rejects_out_of_range_amounts() {
        for raw in ["100000000000000000", "-100000000000000000", "18446744073709551615"] {
            let err = serde_json::from_str::<Money>(raw).unwrap_err();
            assert!(err.to_string().contains("amount out of range"), "{raw}: {err}");
        }
        let m: Money = serde_json::from_str("92233720368547758").unwrap();
        assert_eq!(m.cents(), 9_223_372_036_854_775_800);
    }

    #[test]
    fn test_is_negative() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn test_multiplier_serde_and_default() {
        let m: Multiplier = serde_json::from_str("0.5").unwrap();
        assert_eq!(m.bps(), 5000);
        let m: Multiplier = serde_json::from_str("1").unwrap();
        assert!(m.is_one());
        assert_eq!(Multiplier::default(), Multiplier::ONE);
        assert_eq!(Multiplier::from_bps(5000).to_string(), "x0.5");
        assert_eq!(serde_json::to_string(&Multiplier::from_bps(7500)).unwrap(), "0.75");
    }
}
