//! Coupons and the coupon collaborator.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a coupon does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// Percentage off the subtotal, in basis points (1000 = 10%).
    Percent,
    /// Fixed amount off the subtotal.
    FixedCart,
    /// Shipping becomes free; no subtotal discount.
    FreeShipping,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::Percent => "percent",
            CouponKind::FixedCart => "fixed_cart",
            CouponKind::FreeShipping => "free_shipping",
        }
    }
}

/// A coupon definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Code, stored lower case.
    pub code: String,
    pub kind: CouponKind,
    /// Basis points for `Percent`, minor units for `FixedCart`, ignored otherwise.
    pub amount: i64,
    /// Subtotal needed for the coupon to apply.
    pub minimum_spend: Option<Money>,
    pub active: bool,
}

impl Coupon {
    pub fn percent(code: &str, basis_points: i64) -> Self {
        Self::build(code, CouponKind::Percent, basis_points)
    }

    pub fn fixed_cart(code: &str, amount: Money) -> Self {
        Self::build(code, CouponKind::FixedCart, amount.amount)
    }

    pub fn free_shipping(code: &str) -> Self {
        Self::build(code, CouponKind::FreeShipping, 0)
    }

    pub fn with_minimum_spend(mut self, min: Money) -> Self {
        self.minimum_spend = Some(min);
        self
    }

    fn build(code: &str, kind: CouponKind, amount: i64) -> Self {
        Self {
            code: normalize_code(code),
            kind,
            amount,
            minimum_spend: None,
            active: true,
        }
    }

    /// Whether the subtotal meets the minimum spend.
    pub fn is_satisfied_by(&self, subtotal: &Money) -> bool {
        match &self.minimum_spend {
            Some(min) => subtotal.currency == min.currency && subtotal.amount >= min.amount,
            None => true,
        }
    }

    /// Discount this coupon gives on `remaining`, never more than `remaining`.
    pub fn discount_on(&self, remaining: &Money) -> Option<Money> {
        let raw = match self.kind {
            CouponKind::Percent => remaining.try_basis_points(self.amount)?,
            CouponKind::FixedCart => Money::new(self.amount, remaining.currency),
            CouponKind::FreeShipping => Money::zero(remaining.currency),
        };
        Some(raw.min(*remaining))
    }
}

/// Codes compare case-insensitively and ignore surrounding whitespace.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Lookup of coupon definitions.
pub trait CouponStore: Send + Sync {
    fn get_coupon(&self, code: &str) -> Result<Option<Coupon>, CommerceError>;
}

/// In-memory coupon table.
#[derive(Debug, Clone, Default)]
pub struct MemoryCoupons {
    coupons: HashMap<String, Coupon>,
}

impl MemoryCoupons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupons.insert(coupon.code.clone(), coupon);
        self
    }
}

impl CouponStore for MemoryCoupons {
    fn get_coupon(&self, code: &str) -> Result<Option<Coupon>, CommerceError> {
        Ok(self.coupons.get(&normalize_code(code)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn usd(amount: i64) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_percent_discount() {
        let c = Coupon::percent("SAVE10", 1000);
        assert_eq!(c.code, "save10");
        assert_eq!(c.discount_on(&usd(2500)).unwrap().amount, 250);
    }

    #[test]
    fn test_fixed_discount_capped() {
        let c = Coupon::fixed_cart("tenoff", usd(1000));
        assert_eq!(c.discount_on(&usd(600)).unwrap().amount, 600);
    }

    #[test]
    fn test_minimum_spend() {
        let c = Coupon::percent("big", 500).with_minimum_spend(usd(10000));
        assert!(!c.is_satisfied_by(&usd(9999)));
        assert!(c.is_satisfied_by(&usd(10000)));
    }

    #[test]
    fn test_store_lookup_is_case_insensitive() {
        let store = MemoryCoupons::new().with_coupon(Coupon::free_shipping("ShipFree"));
        assert!(store.get_coupon("  SHIPFREE ").unwrap().is_some());
        assert!(store.get_coupon("other").unwrap().is_none());
    }
}
