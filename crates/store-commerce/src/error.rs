//! Commerce error types.

use thiserror::Error;

/// Errors raised by cart, shipping, catalog and payment operations.
///
/// Each variant describes one condition. The API layer maps every variant to
/// exactly one stable error code, so new variants need a mapping there too.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Product exists but cannot be bought.
    #[error("Product cannot be purchased: {0}")]
    ProductNotPurchasable(String),

    /// Line item key is not in the cart.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Requested quantity is out of range.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Not enough stock to satisfy the request.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// Shipping is switched off for the store.
    #[error("Shipping is disabled")]
    ShippingDisabled,

    /// Package id does not reference a package in the cart.
    #[error("Invalid package ID: {0}")]
    InvalidPackage(u32),

    /// Rate id is not a candidate rate of the package.
    #[error("Invalid rate ID {rate_id} for package {package_id}")]
    InvalidRate { package_id: u32, rate_id: String },

    /// Package rates were invalidated by a later cart change.
    #[error("Shipping rates for package {0} are out of date")]
    StaleShippingRates(u32),

    /// Coupon code is unknown or inactive.
    #[error("Coupon does not exist: {0}")]
    CouponNotFound(String),

    /// Coupon code is already applied.
    #[error("Coupon already applied: {0}")]
    CouponAlreadyApplied(String),

    /// Coupon code is not applied to the cart.
    #[error("Coupon not applied: {0}")]
    CouponNotApplied(String),

    /// Coupon conditions are not met.
    #[error("Coupon {code} cannot be applied: {reason}")]
    CouponNotApplicable { code: String, reason: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Category term does not exist.
    #[error("Term not found: {0}")]
    TermNotFound(u64),

    /// Payment data contained a value that is not a scalar.
    #[error("Invalid payment data for key {0}: value must be a scalar")]
    InvalidPaymentData(String),

    /// Gateway rejected the payment.
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}
