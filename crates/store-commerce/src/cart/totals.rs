//! Cart totals.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// How tax is charged on a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Flat rate in basis points (825 = 8.25%).
    pub rate_basis_points: i64,
    /// Whether shipping is taxed too.
    pub tax_shipping: bool,
}

impl TaxPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn flat(rate_basis_points: i64) -> Self {
        Self {
            rate_basis_points,
            tax_shipping: true,
        }
    }
}

/// Derived money totals of a cart.
///
/// `total == subtotal - discount_total + shipping_total + tax_total` holds
/// exactly, because every field is computed in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount_total: Money,
    pub shipping_total: Money,
    pub tax_total: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            subtotal: zero,
            discount_total: zero,
            shipping_total: zero,
            tax_total: zero,
            total: zero,
        }
    }

    pub fn currency(&self) -> Currency {
        self.total.currency
    }

    /// Whether the identity between the fields holds.
    pub fn is_consistent(&self) -> bool {
        self.subtotal
            .try_subtract(&self.discount_total)
            .and_then(|m| m.try_add(&self.shipping_total))
            .and_then(|m| m.try_add(&self.tax_total))
            .map_or(false, |expected| expected == self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_totals_are_consistent() {
        assert!(CartTotals::zero(Currency::EUR).is_consistent());
    }

    #[test]
    fn test_inconsistent_totals_detected() {
        let mut totals = CartTotals::zero(Currency::USD);
        totals.total = Money::new(1, Currency::USD);
        assert!(!totals.is_consistent());
    }
}
