//! Money value object.
//!
//! All monetary values are stored as signed i64 cents, never floats.
//! Currency is tracked separately on the invoice; `Money` is a pure
//! magnitude with cents precision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Monetary amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole major units (e.g. euro, dollar).
    pub fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative amounts to zero.
    ///
    /// Used for proration where the unused-time credit may exceed the new
    /// plan's price: the amount due is floored at zero, never a payout.
    pub fn max_zero(&self) -> Self {
        Self(self.0.max(0))
    }

    /// Prorated share of this amount: `self * numerator / denominator`,
    /// rounded half-up, computed in i128 to avoid overflow.
    ///
    /// Returns `Money::ZERO` when the denominator is zero.
    pub fn prorated(&self, numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Money::ZERO;
        }
        let scaled = self.0 as i128 * numerator as i128;
        let denom = denominator as i128;
        let half = denom / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / denom
        } else {
            (scaled - half) / denom
        };
        Self(rounded as i64)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    /// Renders as decimal major units, e.g. `2900` cents as `29.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
