//! Checkout schema.

use super::{PropertySchema, Schema, TotalsSchema};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use store_commerce::cart::CartTotals;
use store_commerce::ids::OrderId;
use store_commerce::payment::PaymentResult;

/// Outcome of a checkout attempt that reached the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutResult {
    pub order_id: OrderId,
    pub payment_method: String,
    pub totals: CartTotals,
    pub payment_result: PaymentResult,
}

/// Response of `POST /checkout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutSchema;

impl Schema for CheckoutSchema {
    type Item = CheckoutResult;

    fn title(&self) -> &'static str {
        "checkout"
    }

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema> {
        BTreeMap::from([
            ("order_id", PropertySchema::string("ID of the order placed for the cart.")),
            ("status", PropertySchema::string("Payment status: success, failure or pending.")),
            ("payment_method", PropertySchema::string("Chosen payment method ID.").writable()),
            (
                "payment_result",
                PropertySchema::object(
                    "Result of the payment attempt.",
                    BTreeMap::from([
                        ("payment_status", PropertySchema::string("Status reported by the gateway.")),
                        ("payment_details", PropertySchema::object("Gateway-specific key/value details.", BTreeMap::new())),
                        ("redirect_url", PropertySchema::string("URL to redirect the customer to, if any.")),
                        ("message", PropertySchema::string("Message from the gateway, if any.")),
                    ]),
                ),
            ),
            ("totals", PropertySchema::object("Order totals.", TotalsSchema.properties())),
        ])
    }

    fn item_response(&self, result: &CheckoutResult) -> Value {
        let payment = &result.payment_result;
        json!({
            "order_id": result.order_id.as_str(),
            "status": payment.status.as_str(),
            "payment_method": result.payment_method,
            "payment_result": {
                "payment_status": payment.status.as_str(),
                "payment_details": payment.details,
                "redirect_url": payment.redirect_url,
                "message": payment.message,
            },
            "totals": TotalsSchema.item_response(&result.totals),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_commerce::money::Currency;
    use store_commerce::payment::PaymentStatus;

    #[test]
    fn test_checkout_response() {
        let result = CheckoutResult {
            order_id: OrderId::new("order_42"),
            payment_method: "bacs".into(),
            totals: CartTotals::zero(Currency::EUR),
            payment_result: PaymentResult::new(PaymentStatus::Pending)
                .with_redirect("https://shop.test/thanks")
                .with_detail("reference", "42"),
        };
        let body = CheckoutSchema.item_response(&result);
        assert_eq!(body["order_id"], "order_42");
        assert_eq!(body["status"], "pending");
        assert_eq!(body["payment_result"]["redirect_url"], "https://shop.test/thanks");
        assert_eq!(body["payment_result"]["payment_details"]["reference"], "42");
        assert_eq!(body["totals"]["currency_code"], "EUR");
    }
}
