//! # Money Module
//!
//! Provides the `Money` type for every price and total on the floor.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    Cola 2.50 × 2 + Water 1.50 = 6.5 (fine)                             │
//! │    0.1 + 0.2             = 0.30000000000000004  ❌                      │
//! │                                                                         │
//! │  A split bill is compared against the order it came from:              │
//! │    split.total() + residual.total() == order.total()                   │
//! │  That equality only holds reliably with integer cents.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tavola_core::money::Money;
//!
//! let cola = Money::from_cents(250); // 2.50
//! let line = cola.multiply_quantity(2);
//! assert_eq!(line + Money::from_cents(150), Money::from_cents(650));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► LineItem.unit_price ──► LineItem.line_total
///                                                 │
///             Order.total ◄───────────────────────┘
///                  │
///                  ├──► TableStatus.total_amount  (badge on the table)
///                  └──► Settlement amount          (Pay $x.xx button)
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use tavola_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(150).to_string(), "$1.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn zero() -> Self {
        Money(0)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Line total for `qty` units at this unit price.
    pub const fn multiply_quantity(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Log formatting only: two decimals behind a fixed `$`. Amounts shown to
/// guests or staff go through the app's configured currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, qty: i64) -> Money {
        self.multiply_quantity(qty)
    }
}

/// Summing line totals into an order total.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(|m| m.0).sum())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(650).to_string(), "$6.50");
        assert_eq!(Money::from_cents(900).to_string(), "$9.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-150).to_string(), "-$1.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_line_math() {
        let cola = Money::from_cents(250);
        let water = Money::from_cents(150);

        assert_eq!(cola.multiply_quantity(2), cola * 2);
        assert_eq!(cola * 2 + water, Money::from_cents(650));
        assert_eq!(Money::from_cents(650) - cola, Money::from_cents(400));

        let mut paid = Money::zero();
        paid += cola;
        paid += water;
        assert_eq!(paid.cents(), 400);
    }

    #[test]
    fn test_sum() {
        let total: Money = [250, 250, 150].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 650);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }
}
