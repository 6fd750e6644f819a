//! Shopping cart module.
//!
//! Contains the cart aggregate, line items, coupons and totals.

mod cart;
mod coupon;
mod totals;

pub use cart::{AppliedCoupon, Cart, LineItem, VariationAttribute, MAX_QUANTITY_PER_ITEM};
pub use coupon::{normalize_code, Coupon, CouponKind, CouponStore, MemoryCoupons};
pub use totals::{CartTotals, TaxPolicy};
