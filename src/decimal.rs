use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::errors::{Result, YieldError};

/// seconds in one accrual day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// fixed-point scale for rates: a rate of `RATE_FACTOR` is 100% per day
pub const RATE_FACTOR: u64 = 1_000_000_000_000;

/// Token amount in base units (e.g. 1_000_000 = 1.0 of a 6-decimal token)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(u128);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_units(units: u128) -> Self {
        Money(units)
    }

    pub const fn units(&self) -> u128 {
        self.0
    }

    /// create from a human amount, truncating below the token's precision
    pub fn from_decimal(d: Decimal, decimals: u32) -> Result<Self> {
        if d.is_sign_negative() {
            return Err(YieldError::InvalidConfiguration {
                message: format!("negative amount: {}", d),
            });
        }
        let scaled = d
            .checked_mul(Decimal::from(10_u64.pow(decimals)))
            .ok_or(YieldError::ArithmeticOverflow)?;
        scaled
            .trunc()
            .to_u128()
            .map(Money)
            .ok_or(YieldError::ArithmeticOverflow)
    }

    /// human amount for a token with `decimals` places
    pub fn to_decimal(&self, decimals: u32) -> Decimal {
        i128::try_from(self.0)
            .ok()
            .and_then(|v| Decimal::try_from_i128_with_scale(v, decimals).ok())
            .unwrap_or(Decimal::MAX)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0.checked_add(other.0).map(Money).ok_or(YieldError::ArithmeticOverflow)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }

    /// largest multiple of `factor` not above self
    pub fn round_down(self, factor: Money) -> Self {
        if factor.is_zero() {
            return self;
        }
        Money((self.0 / factor.0) * factor.0)
    }

    /// smallest multiple of `factor` not below self
    pub fn round_up(self, factor: Money) -> Self {
        let down = self.round_down(factor);
        if down < self {
            down + factor
        } else {
            down
        }
    }

    pub fn is_multiple_of(&self, factor: Money) -> bool {
        !factor.is_zero() && self.0 % factor.0 == 0
    }

    /// amount scaled by a rate, rounded down: `self * rate / RATE_FACTOR`
    pub fn apply_rate(&self, rate: Rate) -> Result<Self> {
        mul_div_floor(self.0, rate.raw() as u128, 1, RATE_FACTOR as u128).map(Money)
    }
}

/// floor(a * b * c / d), failing instead of wrapping
pub fn mul_div_floor(a: u128, b: u128, c: u128, d: u128) -> Result<u128> {
    if d == 0 {
        return Err(YieldError::ArithmeticOverflow);
    }
    let product = a
        .checked_mul(b)
        .and_then(|ab| ab.checked_mul(c))
        .ok_or(YieldError::ArithmeticOverflow)?;
    Ok(product / d)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Money {
    fn from(v: u64) -> Self {
        Money(v as u128)
    }
}

impl From<u128> for Money {
    fn from(v: u128) -> Self {
        Money(v)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// daily rate as a fixed-point fraction scaled by [`RATE_FACTOR`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(u64);

impl Rate {
    pub const ZERO: Rate = Rate(0);
    pub const ONE: Rate = Rate(RATE_FACTOR);

    pub const fn from_raw(raw: u64) -> Self {
        Rate(raw)
    }

    /// create from percentage (e.g., 3 for 3%)
    pub const fn from_percentage(p: u32) -> Self {
        Rate(p as u64 * (RATE_FACTOR / 100))
    }

    /// create from basis points (e.g., 25 for 0.25%)
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps as u64 * (RATE_FACTOR / 10_000))
    }

    /// create from a decimal fraction (e.g., 0.0005 for 0.05%)
    pub fn from_decimal(d: Decimal) -> Result<Self> {
        if d.is_sign_negative() {
            return Err(YieldError::InvalidConfiguration {
                message: format!("negative rate: {}", d),
            });
        }
        d.checked_mul(Decimal::from(RATE_FACTOR))
            .ok_or(YieldError::ArithmeticOverflow)?
            .trunc()
            .to_u64()
            .map(Rate)
            .ok_or(YieldError::ArithmeticOverflow)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(RATE_FACTOR)
    }

    pub fn as_percentage(&self) -> Decimal {
        self.as_decimal() * Decimal::from(100)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}
