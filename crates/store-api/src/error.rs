//! Route error taxonomy.
//!
//! Every failure a client can see is a [`RouteError`]. Each variant carries a
//! stable machine-readable code, and the variant alone decides the HTTP status.

use http::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use store_commerce::CommerceError;
use store_session::CacheError;
use thiserror::Error;

/// Message returned for every internal error. The detail is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

/// Broad category of a [`RouteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    FeatureDisabled,
    Forbidden,
    NotAcceptable,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound | ErrorKind::FeatureDisabled => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors returned by routes and the dispatcher.
#[derive(Error, Debug)]
pub enum RouteError {
    /// Malformed or out-of-range input. `params` maps field names to reasons.
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
        params: BTreeMap<String, String>,
    },

    /// The addressed resource does not exist.
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    /// The feature behind the route is switched off.
    #[error("{message}")]
    FeatureDisabled { code: &'static str, message: String },

    /// The caller lacks the capability the route requires.
    #[error("{0}")]
    Forbidden(String),

    /// The client does not accept JSON.
    #[error("{0}")]
    NotAcceptable(String),

    /// The request conflicts with the current cart state.
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    /// Anything else. Never shown to the client.
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl RouteError {
    /// A required argument was absent.
    pub fn missing_params<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let params: BTreeMap<String, String> = names
            .into_iter()
            .map(|n| (n.into(), "is a required property".to_string()))
            .collect();
        let joined = params.keys().cloned().collect::<Vec<_>>().join(", ");
        RouteError::Validation {
            code: "missing_param",
            message: format!("Missing parameter(s): {}", joined),
            params,
        }
    }

    /// One or more arguments failed validation.
    pub fn invalid_params(params: BTreeMap<String, String>) -> Self {
        let joined = params.keys().cloned().collect::<Vec<_>>().join(", ");
        RouteError::Validation {
            code: "invalid_param",
            message: format!("Invalid parameter(s): {}", joined),
            params,
        }
    }

    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        Self::invalid_params(BTreeMap::from([(name.to_string(), reason.into())]))
    }

    pub fn invalid_json(detail: impl std::fmt::Display) -> Self {
        RouteError::Validation {
            code: "invalid_json",
            message: format!("Invalid JSON body passed: {}", detail),
            params: BTreeMap::new(),
        }
    }

    pub fn not_found() -> Self {
        RouteError::NotFound {
            code: "not_found",
            message: "No route was found matching the URL and request method.".to_string(),
        }
    }

    pub fn forbidden() -> Self {
        RouteError::Forbidden("Sorry, you are not allowed to do that.".to_string())
    }

    pub fn not_acceptable() -> Self {
        RouteError::NotAcceptable("This endpoint only produces application/json.".to_string())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        RouteError::Internal(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::Validation { .. } => ErrorKind::Validation,
            RouteError::NotFound { .. } => ErrorKind::NotFound,
            RouteError::FeatureDisabled { .. } => ErrorKind::FeatureDisabled,
            RouteError::Forbidden(_) => ErrorKind::Forbidden,
            RouteError::NotAcceptable(_) => ErrorKind::NotAcceptable,
            RouteError::Conflict { .. } => ErrorKind::Conflict,
            RouteError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    pub fn code(&self) -> &'static str {
        match self {
            RouteError::Validation { code, .. }
            | RouteError::NotFound { code, .. }
            | RouteError::FeatureDisabled { code, .. }
            | RouteError::Conflict { code, .. } => code,
            RouteError::Forbidden(_) => "forbidden",
            RouteError::NotAcceptable(_) => "not_acceptable",
            RouteError::Internal(_) => "internal_error",
        }
    }

    /// Client-facing message.
    pub fn message(&self) -> String {
        match self {
            RouteError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// The `{code, message, data: {status, params?}}` body.
    pub fn to_envelope(&self) -> Value {
        let mut data = Map::new();
        data.insert("status".to_string(), json!(self.status().as_u16()));
        if let RouteError::Validation { params, .. } = self {
            if !params.is_empty() {
                data.insert("params".to_string(), json!(params));
            }
        }
        json!({
            "code": self.code(),
            "message": self.message(),
            "data": Value::Object(data),
        })
    }
}

fn validation(code: &'static str, err: &CommerceError) -> RouteError {
    RouteError::Validation {
        code,
        message: err.to_string(),
        params: BTreeMap::new(),
    }
}

fn not_found(code: &'static str, err: &CommerceError) -> RouteError {
    RouteError::NotFound {
        code,
        message: err.to_string(),
    }
}

fn conflict(code: &'static str, err: &CommerceError) -> RouteError {
    RouteError::Conflict {
        code,
        message: err.to_string(),
    }
}

impl From<CommerceError> for RouteError {
    fn from(err: CommerceError) -> Self {
        use CommerceError::*;
        match &err {
            ProductNotFound(_) => not_found("invalid_product", &err),
            ProductNotPurchasable(_) => conflict("product_not_purchasable", &err),
            CartItemNotFound(_) => not_found("invalid_cart_item", &err),
            InvalidQuantity(_) | QuantityExceedsLimit(..) => validation("invalid_quantity", &err),
            InsufficientStock { .. } => conflict("insufficient_stock", &err),
            ShippingDisabled => RouteError::FeatureDisabled {
                code: "shipping_disabled",
                message: err.to_string(),
            },
            InvalidPackage(_) => not_found("invalid_package", &err),
            InvalidRate { .. } => not_found("invalid_rate", &err),
            StaleShippingRates(_) => conflict("stale_shipping_rates", &err),
            CouponNotFound(_) => not_found("invalid_coupon", &err),
            CouponAlreadyApplied(_) => conflict("coupon_already_applied", &err),
            CouponNotApplied(_) => not_found("coupon_not_applied", &err),
            CouponNotApplicable { .. } => validation("coupon_not_applicable", &err),
            EmptyCart => conflict("cart_empty", &err),
            TermNotFound(_) => not_found("invalid_term", &err),
            InvalidPaymentData(key) => RouteError::Validation {
                code: "invalid_payment_data",
                message: err.to_string(),
                params: BTreeMap::from([(key.clone(), "must be a scalar value".to_string())]),
            },
            PaymentFailed(_) => validation("payment_failed", &err),
            CurrencyMismatch { .. } | Overflow | StorageError(_) => {
                RouteError::Internal(anyhow::anyhow!("{}", err))
            }
        }
    }
}

impl From<CacheError> for RouteError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::ConcurrentModification { .. } => RouteError::Conflict {
                code: "cart_conflict",
                message: "The cart was changed by another request. Reload it and try again."
                    .to_string(),
            },
            other => RouteError::Internal(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_errors_map_to_stable_codes() {
        let cases = [
            (CommerceError::InvalidPackage(3), "invalid_package", 404),
            (
                CommerceError::InvalidRate {
                    package_id: 3,
                    rate_id: "x".into(),
                },
                "invalid_rate",
                404,
            ),
            (CommerceError::StaleShippingRates(3), "stale_shipping_rates", 409),
            (CommerceError::ShippingDisabled, "shipping_disabled", 404),
            (CommerceError::EmptyCart, "cart_empty", 409),
            (CommerceError::PaymentFailed("declined".into()), "payment_failed", 400),
        ];
        for (err, code, status) in cases {
            let route: RouteError = err.into();
            assert_eq!(route.code(), code);
            assert_eq!(route.status().as_u16(), status);
        }
    }

    #[test]
    fn test_lost_cart_write_is_conflict() {
        let err: RouteError = CacheError::ConcurrentModification {
            key: "cart:s".into(),
            expected: 1,
            found: 2,
        }
        .into();
        assert_eq!(err.code(), "cart_conflict");
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: RouteError = CacheError::StoreError("down".into()).into();
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn test_shipping_disabled_is_feature_disabled() {
        let err: RouteError = CommerceError::ShippingDisabled.into();
        assert_eq!(err.kind(), ErrorKind::FeatureDisabled);
    }

    #[test]
    fn test_envelope_shape() {
        let err = RouteError::missing_params(["rate_id"]);
        let body = err.to_envelope();
        assert_eq!(body["code"], "missing_param");
        assert_eq!(body["data"]["status"], 400);
        assert!(body["data"]["params"]["rate_id"].is_string());

        let body = RouteError::not_found().to_envelope();
        assert!(body["data"].get("params").is_none());
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err: RouteError = CommerceError::StorageError("disk on fire".into()).into();
        assert_eq!(err.code(), "internal_error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_envelope().to_string();
        assert!(!body.contains("disk on fire"));
        assert!(body.contains(INTERNAL_ERROR_MESSAGE));
    }
}
