//! Cart line item and coupon collections.

use crate::args::{ArgSchema, ArgSpec};
use crate::error::RouteError;
use crate::route::{read_cart, Route, RouteContext, RouteOutput};
use crate::schema::{CartCouponSchema, CartItemSchema, Schema};
use http::Method;
use serde_json::Value;
use store_commerce::cart::Cart;
use store_commerce::ids::ItemKey;
use store_commerce::CommerceError;

fn items_response(cart: &Cart) -> Value {
    Value::Array(cart.items().iter().map(|item| CartItemSchema.item_response(item)).collect())
}

/// `GET /cart/items`
pub struct ListItems;

impl Route for ListItems {
    fn path(&self) -> &'static str {
        "/cart/items"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn item_schema(&self) -> Value {
        CartItemSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        read_cart(ctx, |cart| Ok(items_response(cart)))
    }
}

/// `GET /cart/items/:key`
pub struct GetItem;

impl Route for GetItem {
    fn path(&self) -> &'static str {
        "/cart/items/:key"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new().arg(
            ArgSpec::string("key")
                .required()
                .describe("Unique identifier for the item within the cart."),
        )
    }

    fn item_schema(&self) -> Value {
        CartItemSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let key = ItemKey::new(ctx.args.require_str("key")?);
        read_cart(ctx, |cart| {
            let item = cart
                .item(&key)
                .ok_or_else(|| CommerceError::CartItemNotFound(key.to_string()))?;
            Ok(CartItemSchema.item_response(item))
        })
    }
}

/// `DELETE /cart/items`: empties the cart and answers with the (empty)
/// item list.
pub struct DeleteItems;

impl Route for DeleteItems {
    fn path(&self) -> &'static str {
        "/cart/items"
    }

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn item_schema(&self) -> Value {
        CartItemSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let controller = ctx.controller;
        let mut record = controller.load_cart(ctx.session)?;
        controller.empty_cart(&mut record.cart);
        controller.recalculate(&mut record.cart)?;
        controller.save_cart(ctx.session, &record)?;
        Ok(RouteOutput::ok(items_response(&record.cart)))
    }
}

/// `GET /cart/coupons`
pub struct ListCoupons;

impl Route for ListCoupons {
    fn path(&self) -> &'static str {
        "/cart/coupons"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn item_schema(&self) -> Value {
        CartCouponSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        read_cart(ctx, |cart| {
            Ok(Value::Array(
                cart.coupons()
                    .iter()
                    .map(|coupon| CartCouponSchema.item_response(coupon))
                    .collect(),
            ))
        })
    }
}
