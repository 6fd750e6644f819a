//! Cart mutation routes. Each one runs the shared load, mutate, recalculate
//! and commit pipeline and answers with the full cart.

use crate::args::{ArgSchema, ArgSpec, Args};
use crate::error::RouteError;
use crate::route::{read_cart, update_cart, Route, RouteContext, RouteOutput};
use crate::schema::{CartSchema, Schema};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use store_commerce::cart::VariationAttribute;
use store_commerce::ids::{ItemKey, ProductId};
use store_commerce::shipping::ShippingDestination;
use store_commerce::CommerceError;

fn cart_schema() -> Value {
    CartSchema.public_item_schema()
}

/// `GET /cart`
pub struct GetCart;

impl Route for GetCart {
    fn path(&self) -> &'static str {
        "/cart"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        read_cart(ctx, |cart| Ok(CartSchema.item_response(cart)))
    }
}

/// `POST /cart/add-item`
pub struct AddItem;

impl Route for AddItem {
    fn path(&self) -> &'static str {
        "/cart/add-item"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
            .arg(ArgSpec::integer("id").required().minimum(1).describe("The cart item product or variation ID."))
            .arg(
                ArgSpec::integer("quantity")
                    .default(json!(1))
                    .minimum(1)
                    .describe("Quantity of this item in the cart."),
            )
            .arg(ArgSpec::array("variation").describe("Chosen attributes (for variations)."))
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let id = product_id(ctx.args, "id")?;
        let quantity = ctx.args.i64("quantity").unwrap_or(1);
        let variation = parse_variation(ctx.args.array("variation"))?;
        update_cart(ctx, StatusCode::CREATED, |controller, cart| {
            controller.add_to_cart(cart, id, quantity, variation)?;
            Ok(())
        })
    }
}

/// `POST /cart/remove-item`
pub struct RemoveItem;

impl Route for RemoveItem {
    fn path(&self) -> &'static str {
        "/cart/remove-item"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new().arg(ArgSpec::string("key").required().describe("Unique identifier (key) for the cart item."))
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let key = ItemKey::new(ctx.args.require_str("key")?);
        update_cart(ctx, StatusCode::OK, |controller, cart| {
            controller.remove_cart_item(cart, &key)?;
            Ok(())
        })
    }
}

/// `POST /cart/update-item`
pub struct UpdateItem;

impl Route for UpdateItem {
    fn path(&self) -> &'static str {
        "/cart/update-item"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
            .arg(ArgSpec::string("key").required().describe("Unique identifier (key) for the cart item."))
            .arg(
                ArgSpec::integer("quantity")
                    .required()
                    .minimum(0)
                    .describe("New quantity of the item; 0 removes it."),
            )
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let key = ItemKey::new(ctx.args.require_str("key")?);
        let quantity = ctx.args.require_i64("quantity")?;
        update_cart(ctx, StatusCode::OK, |controller, cart| {
            controller.set_cart_item_quantity(cart, &key, quantity)
        })
    }
}

/// `POST /cart/apply-coupon`
pub struct ApplyCoupon;

impl Route for ApplyCoupon {
    fn path(&self) -> &'static str {
        "/cart/apply-coupon"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new().arg(ArgSpec::string("code").required().describe("Unique identifier for the coupon within the cart."))
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let code = ctx.args.require_str("code")?;
        update_cart(ctx, StatusCode::OK, |controller, cart| controller.apply_coupon(cart, code))
    }
}

/// `POST /cart/remove-coupon`
pub struct RemoveCoupon;

impl Route for RemoveCoupon {
    fn path(&self) -> &'static str {
        "/cart/remove-coupon"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new().arg(ArgSpec::string("code").required().describe("Unique identifier for the coupon within the cart."))
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let code = ctx.args.require_str("code")?;
        update_cart(ctx, StatusCode::OK, |controller, cart| controller.remove_coupon(cart, code))
    }
}

/// `POST /cart/update-shipping`
pub struct UpdateShipping;

impl Route for UpdateShipping {
    fn path(&self) -> &'static str {
        "/cart/update-shipping"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
            .arg(ArgSpec::string("country").required().describe("ISO code for the country of the address being shipped to."))
            .arg(ArgSpec::string("state").describe("ISO code or name for the state, province, or district."))
            .arg(ArgSpec::string("city").describe("City name."))
            .arg(ArgSpec::string("postcode").describe("Zip or Postcode."))
            .arg(ArgSpec::string("address_1").describe("First line of the address."))
            .arg(ArgSpec::string("address_2").describe("Second line of the address."))
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let args = ctx.args;
        let field = |name: &str| args.str(name).unwrap_or_default().to_string();
        let destination = ShippingDestination {
            address_1: field("address_1"),
            address_2: field("address_2"),
            city: field("city"),
            state: field("state"),
            postcode: field("postcode"),
            country: field("country"),
        };
        if destination.country.trim().is_empty() {
            return Err(RouteError::invalid_param("country", "country must not be empty"));
        }
        update_cart(ctx, StatusCode::OK, |controller, cart| {
            controller.update_shipping_destination(cart, destination);
            Ok(())
        })
    }
}

/// `POST /cart/select-shipping-rate/:package_id`
pub struct SelectShippingRate;

impl Route for SelectShippingRate {
    fn path(&self) -> &'static str {
        "/cart/select-shipping-rate/:package_id"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
            .arg(
                ArgSpec::integer("package_id")
                    .required()
                    .minimum(0)
                    .describe("The ID of the package being shipped."),
            )
            .arg(ArgSpec::string("rate_id").required().describe("The chosen rate ID for the package."))
    }

    fn item_schema(&self) -> Value {
        cart_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        if !ctx.controller.settings().shipping_enabled {
            return Err(CommerceError::ShippingDisabled.into());
        }
        let package_id = ctx.args.require_i64("package_id")?;
        let package_id = u32::try_from(package_id)
            .map_err(|_| RouteError::invalid_param("package_id", "package_id is out of range"))?;
        let rate_id = ctx.args.require_str("rate_id")?;

        update_cart(ctx, StatusCode::OK, |controller, cart| {
            if cart.needs_shipping() {
                controller.select_shipping_rate(cart, package_id, rate_id)?;
            }
            Ok(())
        })
    }
}

fn product_id(args: &Args, name: &str) -> Result<ProductId, RouteError> {
    let raw = args.require_i64(name)?;
    u64::try_from(raw)
        .map(ProductId)
        .map_err(|_| RouteError::invalid_param(name, format!("{} must be positive", name)))
}

/// Parse `[{attribute, value}, ...]`.
fn parse_variation(raw: &[Value]) -> Result<Vec<VariationAttribute>, RouteError> {
    raw.iter()
        .map(|entry| {
            let attribute = entry.get("attribute").and_then(Value::as_str);
            let value = entry.get("value").and_then(Value::as_str);
            match (attribute, value) {
                (Some(attribute), Some(value)) => Ok(VariationAttribute::new(attribute, value)),
                _ => Err(RouteError::invalid_param(
                    "variation",
                    "variation entries need string attribute and value fields",
                )),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variation() {
        let raw = vec![json!({"attribute": "Color", "value": "Red"})];
        let parsed = parse_variation(&raw).unwrap();
        assert_eq!(parsed, vec![VariationAttribute::new("Color", "Red")]);

        let err = parse_variation(&[json!("Red")]).unwrap_err();
        assert_eq!(err.code(), "invalid_param");
    }

    #[test]
    fn test_select_rate_args_require_rate_id() {
        let mut raw = serde_json::Map::new();
        raw.insert("package_id".into(), json!("7"));
        let err = SelectShippingRate.args().validate(raw).unwrap_err();
        assert_eq!(err.code(), "missing_param");
    }
}
