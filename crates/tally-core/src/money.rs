//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Till counts are summed from nine denominations, three of which are    │
//! │  fractional (€0.50, €0.20, €0.10):                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    0.30 / 0.10 = 2.9999999999999996 → intval → 2 coins  ❌ WRONG!       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    30 cents / 10 cents = 3 coins, exactly                              │
//! │    A variance of €0.00 really is zero, not 1e-14                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The POS data store reports decimals (`PAYMENTS.TOTAL`, `TICKETLINES.PRICE`).
//! Those enter the system exactly once, through [`Money::from_decimal`], and
//! everything downstream stays in cents.
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let float = Money::from_cents(15000); // €150.00
//! let counted = Money::from_decimal(512.30);
//!
//! assert_eq!((counted - float).cents(), 36230);
//! assert_eq!(format!("{}", counted), "€512.30");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in euro cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: variances and cash-back adjustments go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as the bare cent count**, so cached payloads stay compact
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  POS PAYMENTS.TOTAL ──► TransactionRecord.amount ──► DailySummary       │
/// │                                                                         │
/// │  Denomination counts ──► total_cash_counted ──┐                         │
/// │  cash_back, money_added, prior float ─────────┼──► variance             │
/// │  POS cash total ──────────────────────────────┘                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // €10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount from the POS data store, rounding half away
    /// from zero to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.345).cents(), 1235);
    /// assert_eq!(Money::from_decimal(-0.005).cents(), -1);
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_decimal(value: f64) -> Self {
        if !value.is_finite() {
            return Money::zero();
        }
        // Nudge by a tiny epsilon so binary artefacts like 1.005 → 1.00499999
        // still land on the intended half-cent.
        let scaled = value * 100.0;
        let nudged = scaled + scaled.signum() * 1e-7;
        Money(nudged.round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-euro portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cent portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Splits this amount into whole multiples of `unit` and a remainder.
    ///
    /// Truncates toward zero, so `€2.50` in `€1.00` units is `(2, €0.50)`.
    /// A zero `unit` yields `(0, self)`.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let (count, rest) = Money::from_cents(25_000).split_into(Money::from_cents(5_000));
    /// assert_eq!(count, 5);
    /// assert!(rest.is_zero());
    /// ```
    pub const fn split_into(&self, unit: Money) -> (i64, Money) {
        if unit.0 == 0 {
            return (0, *self);
        }
        (self.0 / unit.0, Money(self.0 % unit.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `€12.34` / `-€5.50`, the format used in export rows.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.euros().abs(), self.cents_part())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a count (denomination counts, quantities).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
