use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const CURRENCY_CODE: &str = "VND";
pub const CURRENCY_SYMBOL: &str = "₫";

//--------------------------------------       Money         ---------------------------------------------------------
/// An amount of money in the minor currency unit. There are no fractional units anywhere in the checkout pipeline.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),
    #[error("Value cannot be represented as money: {0}")]
    Conversion(String),
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Money {
    type Error = MoneyError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| MoneyError::Conversion(format!("{value} is too large to represent as money")))
    }
}

impl TryFrom<i128> for Money {
    type Error = MoneyError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| MoneyError::Conversion(format!("{value} is out of range for money")))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Accepts whole đồng, optionally with `,`, `_` or space thousands separators, e.g. `70,000`. The đồng has no minor
    /// unit, so anything with a decimal point is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('.') {
            return Err(MoneyError::Conversion(format!("'{s}': amounts are whole đồng, without a fractional part")));
        }
        let cleaned = s
            .trim()
            .trim_end_matches(CURRENCY_SYMBOL)
            .trim_end_matches(CURRENCY_CODE)
            .trim()
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | ' '))
            .collect::<String>();
        cleaned.parse::<i64>().map(Self).map_err(|e| MoneyError::Conversion(format!("'{s}': {e}")))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{grouped}{CURRENCY_SYMBOL}")
    }
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Result<Money, MoneyError> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(|| MoneyError::Overflow(format!("{self} + {rhs}")))
    }

    pub fn checked_sub(self, rhs: Money) -> Result<Money, MoneyError> {
        self.0.checked_sub(rhs.0).map(Self).ok_or_else(|| MoneyError::Overflow(format!("{self} - {rhs}")))
    }

    pub fn checked_mul(self, rhs: i64) -> Result<Money, MoneyError> {
        self.0.checked_mul(rhs).map(Self).ok_or_else(|| MoneyError::Overflow(format!("{self} x {rhs}")))
    }

    /// Sums the amounts, failing instead of wrapping on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(iter: I) -> Result<Money, MoneyError> {
        iter.into_iter().try_fold(Money::ZERO, Money::checked_add)
    }
}
