//! Payment context handed to a gateway.

use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The order being paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRef {
    pub order_id: OrderId,
    /// Cart total at the time the order was placed.
    pub total: Money,
}

impl OrderRef {
    pub fn new(order_id: OrderId, total: Money) -> Self {
        Self { order_id, total }
    }
}

/// Everything a gateway needs for one payment attempt.
///
/// Built once per checkout attempt with [`PaymentContext::builder`] and
/// immutable afterwards. Payment data values are always strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentContext {
    payment_method: String,
    order: OrderRef,
    payment_data: BTreeMap<String, String>,
}

impl PaymentContext {
    pub fn builder(payment_method: impl Into<String>, order: OrderRef) -> PaymentContextBuilder {
        PaymentContextBuilder {
            payment_method: payment_method.into(),
            order,
            payment_data: BTreeMap::new(),
        }
    }

    /// Chosen payment method id.
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn order(&self) -> &OrderRef {
        &self.order
    }

    pub fn payment_data(&self) -> &BTreeMap<String, String> {
        &self.payment_data
    }

    /// Single payment data value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.payment_data.get(key).map(String::as_str)
    }
}

/// Builder for [`PaymentContext`].
#[derive(Debug, Clone)]
pub struct PaymentContextBuilder {
    payment_method: String,
    order: OrderRef,
    payment_data: BTreeMap<String, String>,
}

impl PaymentContextBuilder {
    /// Set one payment data entry.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payment_data.insert(key.into(), value.into());
        self
    }

    /// Set one payment data entry from a JSON scalar.
    pub fn json_data(mut self, key: &str, value: &Value) -> Result<Self, CommerceError> {
        let value = coerce_scalar(key, value)?;
        self.payment_data.insert(key.to_string(), value);
        Ok(self)
    }

    /// Replace all payment data from a JSON payload.
    ///
    /// Accepts either an object (`{"token": "abc"}`) or a list of
    /// `{"key": .., "value": ..}` pairs. `null` clears the data.
    pub fn json_payload(mut self, payload: &Value) -> Result<Self, CommerceError> {
        let mut data = BTreeMap::new();
        match payload {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    data.insert(key.clone(), coerce_scalar(key, value)?);
                }
            }
            Value::Array(pairs) => {
                for pair in pairs {
                    let key = pair
                        .get("key")
                        .and_then(Value::as_str)
                        .ok_or_else(|| CommerceError::InvalidPaymentData("key".to_string()))?;
                    let value = pair.get("value").unwrap_or(&Value::Null);
                    data.insert(key.to_string(), coerce_scalar(key, value)?);
                }
            }
            _ => return Err(CommerceError::InvalidPaymentData("payment_data".to_string())),
        }
        self.payment_data = data;
        Ok(self)
    }

    pub fn build(self) -> PaymentContext {
        PaymentContext {
            payment_method: self.payment_method,
            order: self.order,
            payment_data: self.payment_data,
        }
    }
}

/// String form of a JSON scalar. Arrays and objects are rejected.
fn coerce_scalar(key: &str, value: &Value) -> Result<String, CommerceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) | Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            Err(CommerceError::InvalidPaymentData(key.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use serde_json::json;

    fn order() -> OrderRef {
        OrderRef::new(OrderId::new("order_1"), Money::new(2500, Currency::USD))
    }

    #[test]
    fn test_scalars_become_strings() {
        let ctx = PaymentContext::builder("cod", order())
            .json_payload(&json!({
                "flag": true,
                "off": false,
                "nothing": null,
                "count": 42,
                "ratio": 1.5,
                "token": "abc"
            }))
            .unwrap()
            .build();

        assert_eq!(ctx.payment_method(), "cod");
        assert_eq!(ctx.get("flag"), Some("1"));
        assert_eq!(ctx.get("off"), Some(""));
        assert_eq!(ctx.get("nothing"), Some(""));
        assert_eq!(ctx.get("count"), Some("42"));
        assert_eq!(ctx.get("ratio"), Some("1.5"));
        assert_eq!(ctx.get("token"), Some("abc"));
    }

    #[test]
    fn test_key_value_pairs_accepted() {
        let ctx = PaymentContext::builder("bacs", order())
            .json_payload(&json!([{"key": "ref", "value": 7}]))
            .unwrap()
            .build();
        assert_eq!(ctx.get("ref"), Some("7"));
    }

    #[test]
    fn test_structured_values_rejected() {
        let result = PaymentContext::builder("cod", order()).json_payload(&json!({"card": {"n": 1}}));
        assert!(matches!(result, Err(CommerceError::InvalidPaymentData(k)) if k == "card"));

        let result = PaymentContext::builder("cod", order()).json_data("list", &json!([1]));
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_replaces_earlier_data() {
        let ctx = PaymentContext::builder("cod", order())
            .data("old", "x")
            .json_payload(&json!({"new": "y"}))
            .unwrap()
            .build();
        assert_eq!(ctx.get("old"), None);
        assert_eq!(ctx.payment_data().len(), 1);
    }
}
