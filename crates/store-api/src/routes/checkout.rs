//! Checkout route.

use crate::args::{ArgSchema, ArgSpec};
use crate::error::RouteError;
use crate::route::{Route, RouteContext, RouteOutput};
use crate::schema::{CheckoutResult, CheckoutSchema, Schema};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use store_commerce::ids::OrderId;
use store_commerce::payment::{OrderRef, PaymentContext, PaymentGateway};
use store_commerce::CommerceError;
use tracing::{info, warn};

/// `POST /checkout`
///
/// Places an order for the cart and hands it to the payment gateway. A
/// declined payment leaves the cart untouched; an accepted or pending one
/// empties it.
pub struct Checkout {
    gateway: Arc<dyn PaymentGateway>,
}

impl Checkout {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }
}

impl Route for Checkout {
    fn path(&self) -> &'static str {
        "/checkout"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
            .arg(
                ArgSpec::string("payment_method")
                    .required()
                    .describe("The ID of the payment method being used to process the payment."),
            )
            .arg(ArgSpec::object_or_array("payment_data").describe("Data to pass through to the payment method."))
    }

    fn item_schema(&self) -> Value {
        CheckoutSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let controller = ctx.controller;
        let payment_method = ctx.args.require_str("payment_method")?;

        let mut record = controller.load_cart(ctx.session)?;
        controller.validate_cart_for_checkout(&record.cart)?;
        let totals = controller.recalculate(&mut record.cart)?;

        let order = OrderRef::new(OrderId::generate(), totals.total);
        let context = PaymentContext::builder(payment_method, order)
            .json_payload(ctx.args.get("payment_data").unwrap_or(&Value::Null))?
            .build();
        let payment_result = self.gateway.process(&context)?;

        if payment_result.is_failure() {
            let reason = payment_result
                .message
                .clone()
                .unwrap_or_else(|| "the payment was declined".to_string());
            warn!(payment_method, order_id = %context.order().order_id, "payment declined");
            return Err(CommerceError::PaymentFailed(reason).into());
        }

        let order_id = context.order().order_id.clone();
        info!(
            payment_method,
            order_id = %order_id,
            status = payment_result.status.as_str(),
            "order placed"
        );
        controller.empty_cart(&mut record.cart);
        controller.recalculate(&mut record.cart)?;
        controller.save_cart(ctx.session, &record)?;

        let result = CheckoutResult {
            order_id,
            payment_method: payment_method.to_string(),
            totals,
            payment_result,
        };
        Ok(RouteOutput::ok(CheckoutSchema.item_response(&result)))
    }
}
