//! End-to-end shipping rate selection through the router.

mod common;

use common::{usd, Harness, HOODIE};
use serde_json::json;
use std::sync::Arc;
use store_api::StoreSettings;
use store_commerce::cart::{Cart, LineItem};
use store_commerce::shipping::{PackageContents, ShippingEngine, ShippingRate};

/// Ships everything as package 7 with two rates.
struct SinglePackage;

impl ShippingEngine for SinglePackage {
    fn packages(&self, cart: &Cart) -> Vec<PackageContents> {
        let items: Vec<LineItem> = cart.items().iter().filter(|i| i.needs_shipping).cloned().collect();
        vec![PackageContents {
            package_id: 7,
            name: "Parcel".to_string(),
            destination: cart.destination().cloned().unwrap_or_default(),
            items,
        }]
    }

    fn get_rates(&self, _package: &PackageContents) -> Vec<ShippingRate> {
        vec![
            ShippingRate::new("flat_rate", "Flat rate", usd(700)),
            ShippingRate::new("free_shipping", "Free shipping", usd(0)),
        ]
    }
}

#[test]
fn test_select_rate_when_shipping_disabled() {
    let h = Harness::with(StoreSettings::default().with_shipping(false), Arc::new(SinglePackage));
    let (status, _) = h.call("POST", "/cart/add-item", Some(json!({"id": HOODIE})));
    assert_eq!(status, 201);
    let before = h.stored_cart().unwrap();
    let writes = h.carts.put_count();

    let (status, body) = h.call(
        "POST",
        "/cart/select-shipping-rate/7",
        Some(json!({"rate_id": "free_shipping"})),
    );
    assert_eq!(status, 404);
    assert_eq!(body["code"], "shipping_disabled");
    assert_eq!(body["data"]["status"], 404);
    assert_eq!(h.carts.put_count(), writes);
    assert_eq!(h.stored_cart().unwrap(), before);
}

#[test]
fn test_select_free_shipping_on_package() {
    let h = Harness::with(StoreSettings::default(), Arc::new(SinglePackage));
    let (_, cart) = h.call("POST", "/cart/add-item", Some(json!({"id": HOODIE, "quantity": 2})));
    assert_eq!(cart["shipping_packages"][0]["package_id"], 7);
    assert_eq!(cart["shipping_packages"][0]["selected_rate"], "flat_rate");
    assert_eq!(cart["totals"]["shipping_total"], 700);

    let (status, cart) = h.call(
        "POST",
        "/cart/select-shipping-rate/7",
        Some(json!({"rate_id": "free_shipping"})),
    );
    assert_eq!(status, 200);
    let package = &cart["shipping_packages"][0];
    assert_eq!(package["selected_rate"], "free_shipping");
    assert_eq!(package["shipping_rates"][1]["selected"], true);
    assert_eq!(package["shipping_rates"][0]["selected"], false);
    assert_eq!(cart["totals"]["shipping_total"], 0);
    assert_eq!(cart["totals"]["total"], 8000);

    let stored = h.stored_cart().unwrap();
    assert_eq!(stored.package(7).unwrap().selected_rate(), Some("free_shipping"));
}

#[test]
fn test_missing_rate_id_is_rejected_before_any_write() {
    let h = Harness::with(StoreSettings::default(), Arc::new(SinglePackage));

    let (status, body) = h.call("POST", "/cart/select-shipping-rate/7", Some(json!({})));
    assert_eq!(status, 400);
    assert_eq!(body["code"], "missing_param");
    assert!(body["data"]["params"]["rate_id"].is_string());
    assert_eq!(h.carts.put_count(), 0);
    assert!(h.stored_cart().is_none());
}

#[test]
fn test_unknown_package_and_rate() {
    let h = Harness::with(StoreSettings::default(), Arc::new(SinglePackage));
    h.call("POST", "/cart/add-item", Some(json!({"id": HOODIE})));
    let writes = h.carts.put_count();

    let (status, body) = h.call("POST", "/cart/select-shipping-rate/3", Some(json!({"rate_id": "flat_rate"})));
    assert_eq!((status, body["code"].as_str()), (404, Some("invalid_package")));

    let (status, body) = h.call("POST", "/cart/select-shipping-rate/7", Some(json!({"rate_id": "pigeon"})));
    assert_eq!((status, body["code"].as_str()), (404, Some("invalid_rate")));

    let (status, body) = h.call("POST", "/cart/select-shipping-rate/abc", Some(json!({"rate_id": "flat_rate"})));
    assert_eq!((status, body["code"].as_str()), (400, Some("invalid_param")));

    assert_eq!(h.carts.put_count(), writes);
}

#[test]
fn test_selection_survives_unrelated_recalculation() {
    let h = Harness::with(StoreSettings::default(), Arc::new(SinglePackage));
    h.call("POST", "/cart/add-item", Some(json!({"id": HOODIE})));
    h.call("POST", "/cart/select-shipping-rate/7", Some(json!({"rate_id": "free_shipping"})));

    let (_, cart) = h.call("POST", "/cart/add-item", Some(json!({"id": HOODIE})));
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["shipping_packages"][0]["selected_rate"], "free_shipping");
}

#[test]
fn test_virtual_cart_selection_is_a_no_op() {
    let h = Harness::new();
    h.call("POST", "/cart/add-item", Some(json!({"id": common::EBOOK})));

    let (status, cart) = h.call("POST", "/cart/select-shipping-rate/0", Some(json!({"rate_id": "flat_rate"})));
    assert_eq!(status, 200);
    assert_eq!(cart["needs_shipping"], false);
    assert_eq!(cart["shipping_packages"], json!([]));
}
