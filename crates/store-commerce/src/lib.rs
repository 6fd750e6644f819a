//! Store domain types and logic.
//!
//! This crate holds everything the Store API operates on:
//!
//! - **Catalog**: products, category terms, the category tree builder
//! - **Cart**: line items, coupons, totals
//! - **Shipping**: destinations, packages, rates and the rate engine
//! - **Payment**: the payment context and gateway collaborator
//!
//! # Example
//!
//! ```rust
//! use store_commerce::prelude::*;
//!
//! let product = Product::new(1, "Beanie", Money::new(1800, Currency::USD));
//! let mut cart = Cart::new(Currency::USD);
//! cart.add_item(&product, 2, vec![]).unwrap();
//!
//! let totals = cart.calculate_totals(&TaxPolicy::none()).unwrap();
//! assert_eq!(totals.total.amount, 3600);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod payment;
pub mod shipping;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        build_category_tree, select_categories, CatalogStore, CategoryNode, CategoryQuery,
        MemoryCatalog, Product, Term,
    };

    // Cart
    pub use crate::cart::{
        AppliedCoupon, Cart, CartTotals, Coupon, CouponKind, CouponStore, LineItem,
        MemoryCoupons, TaxPolicy, VariationAttribute,
    };

    // Shipping
    pub use crate::shipping::{
        RateRule, ShippingDestination, ShippingEngine, ShippingPackage, ShippingRate,
        TableRateShipping,
    };

    // Payment
    pub use crate::payment::{
        ManualGateway, OrderRef, PaymentContext, PaymentGateway, PaymentResult, PaymentStatus,
    };
}
