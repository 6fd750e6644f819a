//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit. Every arithmetic
//! operation is checked: mixing currencies or overflowing yields `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn minor_unit(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g. cents).
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Percentage of this amount, rounded half away from zero to the minor unit.
    ///
    /// `basis_points` is hundredths of a percent (1000 = 10%).
    pub fn try_basis_points(&self, basis_points: i64) -> Option<Money> {
        let scaled = (self.amount as i128).checked_mul(basis_points as i128)?;
        let rounded = if scaled >= 0 {
            (scaled + 5_000) / 10_000
        } else {
            (scaled - 5_000) / 10_000
        };
        i64::try_from(rounded)
            .ok()
            .map(|amount| Money::new(amount, self.currency))
    }

    /// The smaller of two amounts in the same currency.
    pub fn min(self, other: Money) -> Money {
        if other.amount < self.amount {
            other
        } else {
            self
        }
    }

    /// Sum an iterator of amounts; `None` on currency mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Decimal text without symbol (e.g. "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.minor_unit();
        if places == 0 {
            return self.amount.to_string();
        }
        let divisor = 10_i64.pow(places);
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / divisor as u64,
            abs % divisor as u64,
            width = places as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency.symbol(), self.display_amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(250, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount, 1250);
        assert_eq!(a.try_subtract(&b).unwrap().amount, 750);
        assert_eq!(a.try_multiply(3).unwrap().amount, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).try_add(&b).is_none());
    }

    #[test]
    fn test_currency_mismatch_is_none() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
        assert!(Money::try_sum([usd, eur].iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_try_sum() {
        let amounts = [Money::new(1000, Currency::USD), Money::new(250, Currency::USD)];
        assert_eq!(Money::try_sum(amounts.iter(), Currency::USD).unwrap().amount, 1250);
        assert_eq!(Money::try_sum(std::iter::empty(), Currency::USD).unwrap().amount, 0);
    }

    #[test]
    fn test_basis_points_rounding() {
        let m = Money::new(1999, Currency::USD);
        // 10% of 19.99 = 1.999 -> 2.00
        assert_eq!(m.try_basis_points(1000).unwrap().amount, 200);
        // 8.25% of 19.99 = 1.649... -> 1.65
        assert_eq!(m.try_basis_points(825).unwrap().amount, 165);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(4999, Currency::USD).to_string(), "$49.99");
        assert_eq!(Money::new(5, Currency::USD).display_amount(), "0.05");
        assert_eq!(Money::new(-150, Currency::EUR).display_amount(), "-1.50");
        assert_eq!(Money::new(100, Currency::JPY).display_amount(), "100");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("XXX"), None);
    }
}
