//! Money in minor units.
//!
//! Prices are kept as whole pence so that totals re-derived from many
//! mutations never drift.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_pence(pence: i64) -> Self {
        Self(pence)
    }

    /// Whole pounds plus pence, e.g. `Money::gbp(17, 0)` is £17.00.
    pub const fn gbp(pounds: i64, pence: i64) -> Self {
        Self(pounds * 100 + pence)
    }

    pub const fn pence(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies by a quantity, saturating instead of overflowing.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0).max(0))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}£{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        self.times(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_pounds_and_pence() {
        assert_eq!(Money::gbp(17, 0).to_string(), "£17.00");
        assert_eq!(Money::from_pence(283).to_string(), "£2.83");
        assert_eq!(Money::from_pence(-5).to_string(), "-£0.05");
    }

    #[test]
    fn test_multiplication_is_exact() {
        assert_eq!(Money::from_pence(283) * 3, Money::from_pence(849));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        assert_eq!(Money::from_pence(100).saturating_sub(Money::from_pence(250)), Money::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_pence(1), Money::from_pence(2)].into_iter().sum();
        assert_eq!(total, Money::from_pence(3));
    }

    #[test]
    fn test_addition_saturates_on_corrupt_prices() {
        let huge = Money::from_pence(i64::MAX - 1);
        assert_eq!(huge + Money::from_pence(500), Money::from_pence(i64::MAX));

        let mut acc = huge;
        acc += huge;
        assert_eq!(acc, Money::from_pence(i64::MAX));

        let total: Money = [huge, huge, Money::from_pence(1)].into_iter().sum();
        assert_eq!(total, Money::from_pence(i64::MAX));
    }
}
