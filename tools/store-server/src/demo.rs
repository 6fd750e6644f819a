//! Demo store: a small in-memory catalog, table rates and coupons.

use std::sync::Arc;
use store_api::{routes, CartController, Router, StoreSettings};
use store_commerce::cart::{Coupon, MemoryCoupons};
use store_commerce::catalog::{MemoryCatalog, Product, Term};
use store_commerce::money::{Currency, Money};
use store_commerce::payment::ManualGateway;
use store_commerce::shipping::{RateRule, TableRateShipping};
use store_session::{Cache, SessionCartStore};

pub fn catalog(currency: Currency) -> MemoryCatalog {
    let price = |amount| Money::new(amount, currency);
    MemoryCatalog::new()
        .with_category(Term::new(1, 0, "Clothing").with_count(3))
        .with_category(Term::new(2, 1, "Hoodies").with_count(1))
        .with_category(Term::new(3, 1, "Accessories").with_count(2))
        .with_category(Term::new(4, 0, "Music").with_count(1))
        .with_category(Term::new(5, 0, "Uncategorized"))
        .with_product(
            Product::new(10, "Hoodie with Logo", price(4500))
                .with_sku("woo-hoodie-with-logo")
                .with_stock(25)
                .in_categories(&[1, 2]),
        )
        .with_product(Product::new(11, "Beanie", price(1800)).with_sku("woo-beanie").in_categories(&[1, 3]))
        .with_product(Product::new(12, "Belt", price(5500)).with_sku("woo-belt").in_categories(&[1, 3]))
        .with_product(
            Product::new(13, "Album", price(1500))
                .with_sku("woo-album")
                .virtual_product()
                .in_categories(&[4]),
        )
}

pub fn shipping(currency: Currency) -> TableRateShipping {
    let price = |amount| Money::new(amount, currency);
    TableRateShipping::default()
        .with_rule(RateRule::new("flat_rate", "Flat rate", price(500)).with_delivery_days(3, 5))
        .with_rule(
            RateRule::new("free_shipping", "Free shipping", price(0))
                .with_min_amount(price(5000))
                .with_delivery_days(5, 8),
        )
        .with_rule(
            RateRule::new("express", "Express", price(1500))
                .for_countries(&["US", "CA"])
                .with_delivery_days(1, 2),
        )
}

pub fn coupons(currency: Currency) -> MemoryCoupons {
    MemoryCoupons::new()
        .with_coupon(Coupon::percent("welcome10", 1000))
        .with_coupon(Coupon::fixed_cart("fiver", Money::new(500, currency)).with_minimum_spend(Money::new(2000, currency)))
        .with_coupon(Coupon::free_shipping("freeship"))
}

/// A store router with every route registered over the demo data.
pub fn store_router(settings: StoreSettings) -> Router {
    let currency = settings.currency;
    let controller = CartController::new(
        settings,
        Arc::new(SessionCartStore::new(Cache::new())),
        Arc::new(catalog(currency)),
    )
    .with_shipping(Arc::new(shipping(currency)))
    .with_coupons(Arc::new(coupons(currency)));

    let mut router = Router::new(Arc::new(controller));
    for route in routes::store_routes(Arc::new(ManualGateway::offline())) {
        router.register(route);
    }
    router
}
