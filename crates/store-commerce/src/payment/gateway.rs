//! Payment gateway collaborator.

use crate::error::CommerceError;
use crate::payment::PaymentContext;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failure,
    /// Accepted, to be settled later (e.g. bank transfer).
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Failure => "failure",
            PaymentStatus::Pending => "pending",
        }
    }
}

/// What the gateway reported back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub status: PaymentStatus,
    /// Where to send the shopper next, if anywhere.
    pub redirect_url: Option<String>,
    pub message: Option<String>,
    pub details: BTreeMap<String, String>,
}

impl PaymentResult {
    pub fn new(status: PaymentStatus) -> Self {
        Self {
            status,
            redirect_url: None,
            message: None,
            details: BTreeMap::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(PaymentStatus::Failure).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status == PaymentStatus::Failure
    }
}

/// Processes a payment for an order.
///
/// `Err` is reserved for the gateway itself failing; a declined payment is an
/// `Ok` result with [`PaymentStatus::Failure`].
pub trait PaymentGateway: Send + Sync {
    fn process(&self, context: &PaymentContext) -> Result<PaymentResult, CommerceError>;
}

/// Offline payment methods with a fixed outcome per method id.
#[derive(Debug, Clone, Default)]
pub struct ManualGateway {
    methods: HashMap<String, PaymentStatus>,
}

impl ManualGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cash on delivery settles immediately; bank transfer stays pending.
    pub fn offline() -> Self {
        Self::new()
            .with_method("cod", PaymentStatus::Success)
            .with_method("bacs", PaymentStatus::Pending)
    }

    pub fn with_method(mut self, id: impl Into<String>, status: PaymentStatus) -> Self {
        self.methods.insert(id.into(), status);
        self
    }
}

impl PaymentGateway for ManualGateway {
    fn process(&self, context: &PaymentContext) -> Result<PaymentResult, CommerceError> {
        let Some(status) = self.methods.get(context.payment_method()) else {
            return Ok(PaymentResult::failure(format!(
                "Payment method {} is not available",
                context.payment_method()
            )));
        };
        Ok(PaymentResult::new(*status)
            .with_detail("order_id", context.order().order_id.as_str())
            .with_detail("amount", context.order().total.display_amount()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OrderId;
    use crate::money::{Currency, Money};
    use crate::payment::OrderRef;

    fn context(method: &str) -> PaymentContext {
        let order = OrderRef::new(OrderId::new("order_9"), Money::new(1999, Currency::USD));
        PaymentContext::builder(method, order).build()
    }

    #[test]
    fn test_offline_methods() {
        let gateway = ManualGateway::offline();
        let result = gateway.process(&context("cod")).unwrap();
        assert_eq!(result.status, PaymentStatus::Success);
        assert_eq!(result.details.get("order_id").map(String::as_str), Some("order_9"));

        let result = gateway.process(&context("bacs")).unwrap();
        assert_eq!(result.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_unknown_method_fails() {
        let result = ManualGateway::offline().process(&context("crypto")).unwrap();
        assert!(result.is_failure());
        assert!(result.message.unwrap().contains("crypto"));
    }
}
