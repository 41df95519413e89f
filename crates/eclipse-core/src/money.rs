//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A shift reconciliation that drifts by even one unit never balances:   │
//! │    opening + income − withdrawals must equal closing EXACTLY           │
//! │                                                                         │
//! │  OUR SOLUTION: i64 whole currency units                                 │
//! │    Room rates and consumable prices are whole amounts ($50,000 base,   │
//! │    $10,000 per extra hour) — no sub-unit handling needed, so the       │
//! │    smallest unit IS the display unit                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use eclipse_core::money::Money;
//!
//! // Create from whole currency units (the only constructor)
//! let base = Money::from_units(50_000);
//!
//! // Arithmetic operations
//! let two_nights = base * 2;                       // $100,000
//! let with_soda = base + Money::from_units(3_000); // $53,000
//!
//! // NEVER do this:
//! // let bad = Money::from_float(50000.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for balance differences
///   (e.g. inherited balance minus a smaller opening float)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// RatePlan.base_price ──► pricing::compute_charge ──► StayRecord.room_subtotal
/// Product.sale_price  ──► ConsumptionEntry.unit_price ──► consumption subtotal
/// Shift.opening_balance + income − withdrawals ──► Shift.closing_balance
/// ```
/// Every monetary value in the system flows through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use eclipse_core::money::Money;
    ///
    /// let price = Money::from_units(50_000);
    /// assert_eq!(price.units(), 50_000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use eclipse_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert_eq!(zero.units(), 0);
    /// assert!(zero.is_zero());
    /// ```
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
    ///
    /// Used when recording an opening-balance adjustment: the stored entry
    /// carries the magnitude, the note carries the direction.
    ///
    /// ## Example
    /// ```rust
    /// use eclipse_core::money::Money;
    ///
    /// let difference = Money::from_units(-25_000);
    /// assert_eq!(difference.abs().units(), 25_000);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use eclipse_core::money::Money;
    ///
    /// let unit_price = Money::from_units(15_000);
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.units(), 30_000);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Bottled Water $3,000
    /// Quantity: 4
    ///      │
    ///      ▼
    /// multiply_quantity(4) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: $12,000
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format with
/// thousands separators, matching the dashboard's rendering.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{}${}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation, for totalling consumption lines and withdrawal entries.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(50_000);
        assert_eq!(money.units(), 50_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_units(50_000)), "$50,000");
        assert_eq!(format!("{}", Money::from_units(1_234_567)), "$1,234,567");
        assert_eq!(format!("{}", Money::from_units(500)), "$500");
        assert_eq!(format!("{}", Money::from_units(-25_000)), "-$25,000");
        assert_eq!(format!("{}", Money::from_units(0)), "$0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(50_000);
        let b = Money::from_units(10_000);

        assert_eq!((a + b).units(), 60_000);
        assert_eq!((a - b).units(), 40_000);
        let result: Money = b * 3;
        assert_eq!(result.units(), 30_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_units(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::from_units(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
    }

    #[test]
    fn test_abs() {
        assert_eq!(Money::from_units(-25_000).abs().units(), 25_000);
        assert_eq!(Money::from_units(25_000).abs().units(), 25_000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_units(15_000);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.units(), 30_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [10_000, 20_000, 5_000]
            .iter()
            .map(|u| Money::from_units(*u))
            .sum();
        assert_eq!(total.units(), 35_000);
    }
}
