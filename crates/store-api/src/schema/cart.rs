//! Cart schemas.

use super::{currency_fields, currency_properties, prepare_html_response, price, PropertySchema, Schema};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use store_commerce::cart::{AppliedCoupon, Cart, CartTotals, LineItem};
use store_commerce::shipping::{ShippingDestination, ShippingPackage};

/// The full cart.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartSchema;

impl Schema for CartSchema {
    type Item = Cart;

    fn title(&self) -> &'static str {
        "cart"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        BTreeMap::from([
            (
                "coupons",
                PropertySchema::array(
                    "List of applied cart coupons.",
                    PropertySchema::object("Applied coupon.", CartCouponSchema.properties()),
                ),
            ),
            (
                "shipping_address",
                PropertySchema::object("Current set shipping address for the customer.", destination_properties()),
            ),
            (
                "items",
                PropertySchema::array(
                    "List of cart items.",
                    PropertySchema::object("Cart item.", CartItemSchema.properties()),
                ),
            ),
            ("items_count", PropertySchema::integer("Number of items in the cart.")),
            (
                "needs_shipping",
                PropertySchema::boolean("True if the cart needs shipping. False for carts with only digital goods or stores with no shipping methods set-up."),
            ),
            (
                "shipping_packages",
                PropertySchema::array(
                    "Available shipping rates for this cart.",
                    PropertySchema::object("Shipping package.", ShippingPackageSchema.properties()),
                ),
            ),
            (
                "totals",
                PropertySchema::object("Cart total amounts provided using the smallest unit of the currency.", TotalsSchema.properties()),
            ),
        ])
    }

    fn item_response(&self, cart: &Cart) -> Value {
        let coupons: Vec<Value> = cart
            .coupons()
            .iter()
            .map(|c| CartCouponSchema.item_response(c))
            .collect();
        let items: Vec<Value> = cart
            .items()
            .iter()
            .map(|i| CartItemSchema.item_response(i))
            .collect();
        let packages: Vec<Value> = cart
            .packages()
            .iter()
            .map(|p| ShippingPackageSchema.item_response(p))
            .collect();
        let default_destination = ShippingDestination::default();
        let destination = cart.destination().unwrap_or(&default_destination);

        json!({
            "coupons": coupons,
            "shipping_address": destination_response(destination),
            "items": items,
            "items_count": cart.item_count(),
            "needs_shipping": cart.needs_shipping(),
            "shipping_packages": packages,
            "totals": TotalsSchema.item_response(cart.totals()),
        })
    }
}

/// One line item.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartItemSchema;

impl Schema for CartItemSchema {
    type Item = LineItem;

    fn title(&self) -> &'static str {
        "cart_item"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        let mut totals = currency_properties();
        totals.insert("line_subtotal", PropertySchema::integer("Line price subtotal (excluding coupons and discounts)."));
        let mut prices = currency_properties();
        prices.insert("price", PropertySchema::integer("Current product price."));

        BTreeMap::from([
            ("key", PropertySchema::string("Unique identifier for the item within the cart.")),
            ("id", PropertySchema::integer("The cart item product or variation ID.").writable()),
            ("quantity", PropertySchema::integer("Quantity of this item in the cart.").writable()),
            ("name", PropertySchema::string("Product name.")),
            ("sku", PropertySchema::string("Stock keeping unit, if applicable.")),
            (
                "variation",
                PropertySchema::array(
                    "Chosen attributes (for variations).",
                    PropertySchema::object(
                        "Variation attribute.",
                        BTreeMap::from([
                            ("attribute", PropertySchema::string("Variation attribute name.")),
                            ("value", PropertySchema::string("Variation attribute value.")),
                        ]),
                    ),
                )
                .writable(),
            ),
            ("needs_shipping", PropertySchema::boolean("Whether the item needs to be shipped.")),
            ("prices", PropertySchema::object("Price data for the product in the current line item.", prices)),
            ("totals", PropertySchema::object("Item total amounts provided using the smallest unit of the currency.", totals)),
        ])
    }

    fn item_response(&self, item: &LineItem) -> Value {
        let currency = item.unit_price.currency;
        let mut prices = currency_fields(currency);
        prices.insert("price".into(), price(&item.unit_price));
        let mut totals = currency_fields(currency);
        totals.insert("line_subtotal".into(), price(&item.line_subtotal));

        let variation: Vec<Value> = item
            .variation
            .iter()
            .map(|v| {
                json!({
                    "attribute": prepare_html_response(&v.attribute),
                    "value": prepare_html_response(&v.value),
                })
            })
            .collect();

        json!({
            "key": item.key.as_str(),
            "id": item.product_id.get(),
            "quantity": item.quantity,
            "name": prepare_html_response(&item.name),
            "sku": item.sku,
            "variation": variation,
            "needs_shipping": item.needs_shipping,
            "prices": prices,
            "totals": totals,
        })
    }
}

/// An applied coupon.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartCouponSchema;

impl Schema for CartCouponSchema {
    type Item = AppliedCoupon;

    fn title(&self) -> &'static str {
        "cart_coupon"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        let mut totals = currency_properties();
        totals.insert("discount_total", PropertySchema::integer("Total discount applied by this coupon."));
        BTreeMap::from([
            ("code", PropertySchema::string("The coupons unique code.").writable()),
            ("discount_type", PropertySchema::string("The discount type for the coupon (e.g. percentage or fixed amount).")),
            ("totals", PropertySchema::object("Total amounts provided using the smallest unit of the currency.", totals)),
        ])
    }

    fn item_response(&self, applied: &AppliedCoupon) -> Value {
        let discount = applied.discount();
        let mut totals = currency_fields(discount.currency);
        totals.insert("discount_total".into(), price(&discount));
        json!({
            "code": applied.coupon.code,
            "discount_type": applied.coupon.kind.as_str(),
            "totals": totals,
        })
    }
}

/// A shipping package with its rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingPackageSchema;

impl Schema for ShippingPackageSchema {
    type Item = ShippingPackage;

    fn title(&self) -> &'static str {
        "cart-shipping-rates"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        let mut rate = currency_properties();
        rate.extend([
            ("rate_id", PropertySchema::string("ID of the shipping rate.")),
            ("name", PropertySchema::string("Name of the shipping rate, e.g. Express shipping.")),
            ("method_id", PropertySchema::string("ID of the shipping method that provided the rate.")),
            ("price", PropertySchema::integer("Price of this shipping rate using the smallest unit of the currency.")),
            ("delivery_time", PropertySchema::string("Delivery time estimate text, e.g. 3-5 business days.")),
            ("selected", PropertySchema::boolean("True if this is the rate currently selected by the customer for the cart.")),
        ]);
        BTreeMap::from([
            ("package_id", PropertySchema::integer("The ID of the package the shipping rates belong to.")),
            ("name", PropertySchema::string("Name of the package.")),
            ("destination", PropertySchema::object("Shipping destination address.", destination_properties())),
            ("items", PropertySchema::array("List of cart item keys in the package.", PropertySchema::string("Cart item key."))),
            ("shipping_rates", PropertySchema::array("List of shipping rates.", PropertySchema::object("Shipping rate.", rate))),
            ("selected_rate", PropertySchema::string("ID of the selected rate, if any.")),
        ])
    }

    fn item_response(&self, package: &ShippingPackage) -> Value {
        let selected = package.selected_rate();
        let rates: Vec<Value> = package
            .rates
            .iter()
            .map(|rate| {
                let mut out = currency_fields(rate.cost.currency);
                out.insert("rate_id".into(), json!(rate.rate_id));
                out.insert("name".into(), json!(prepare_html_response(&rate.name)));
                out.insert("method_id".into(), json!(rate.method_id));
                out.insert("price".into(), price(&rate.cost));
                out.insert(
                    "delivery_time".into(),
                    json!(rate.delivery_estimate().unwrap_or_default()),
                );
                out.insert("selected".into(), json!(selected == Some(rate.rate_id.as_str())));
                Value::Object(out)
            })
            .collect();
        let items: Vec<&str> = package.item_keys.iter().map(|k| k.as_str()).collect();

        json!({
            "package_id": package.package_id,
            "name": prepare_html_response(&package.name),
            "destination": destination_response(&package.destination),
            "items": items,
            "shipping_rates": rates,
            "selected_rate": selected,
        })
    }
}

/// Cart totals in minor units.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalsSchema;

impl Schema for TotalsSchema {
    type Item = CartTotals;

    fn title(&self) -> &'static str {
        "cart_totals"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        let mut properties = currency_properties();
        properties.extend([
            ("subtotal", PropertySchema::integer("Total price of items in the cart.")),
            ("discount_total", PropertySchema::integer("Total discount from applied coupons.")),
            ("shipping_total", PropertySchema::integer("Total price of shipping.")),
            ("tax_total", PropertySchema::integer("Total tax applied to items and shipping.")),
            ("total", PropertySchema::integer("Total price the customer will pay.")),
        ]);
        properties
    }

    fn item_response(&self, totals: &CartTotals) -> Value {
        let mut out = currency_fields(totals.currency());
        out.insert("subtotal".into(), price(&totals.subtotal));
        out.insert("discount_total".into(), price(&totals.discount_total));
        out.insert("shipping_total".into(), price(&totals.shipping_total));
        out.insert("tax_total".into(), price(&totals.tax_total));
        out.insert("total".into(), price(&totals.total));
        Value::Object(out)
    }
}

fn destination_properties() -> BTreeMap<&'static str, PropertySchema> {
    ["address_1", "address_2", "city", "state", "postcode", "country"]
        .into_iter()
        .map(|field| (field, PropertySchema::string("Address field.").writable()))
        .collect()
}

fn destination_response(destination: &ShippingDestination) -> Value {
    json!({
        "address_1": prepare_html_response(&destination.address_1),
        "address_2": prepare_html_response(&destination.address_2),
        "city": prepare_html_response(&destination.city),
        "state": destination.state,
        "postcode": destination.postcode,
        "country": destination.country,
    })
}
