//! Store settings injected into the cart controller.

use serde::{Deserialize, Serialize};
use store_commerce::cart::TaxPolicy;
use store_commerce::money::Currency;
use thiserror::Error;

/// Invalid `[store]` configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Tax rate must be between 0 and 100 percent, got {0}")]
    InvalidTaxRate(f64),
}

/// Store-wide switches the controller reads on every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub currency: Currency,
    pub shipping_enabled: bool,
    pub tax: TaxPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            shipping_enabled: true,
            tax: TaxPolicy::none(),
        }
    }
}

impl StoreSettings {
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_shipping(mut self, enabled: bool) -> Self {
        self.shipping_enabled = enabled;
        self
    }

    pub fn with_tax(mut self, tax: TaxPolicy) -> Self {
        self.tax = tax;
        self
    }
}

/// The `[store]` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreSection {
    /// ISO 4217 currency code.
    pub currency: String,
    pub shipping_enabled: bool,
    /// Flat tax rate, e.g. 8.25.
    pub tax_rate_percent: f64,
    /// Whether shipping is taxed as well.
    pub tax_shipping: bool,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            shipping_enabled: true,
            tax_rate_percent: 0.0,
            tax_shipping: true,
        }
    }
}

impl StoreSection {
    /// Validate and convert to [`StoreSettings`].
    pub fn settings(&self) -> Result<StoreSettings, ConfigError> {
        let currency = Currency::from_code(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))?;
        if !(0.0..=100.0).contains(&self.tax_rate_percent) {
            return Err(ConfigError::InvalidTaxRate(self.tax_rate_percent));
        }
        let tax = TaxPolicy {
            rate_basis_points: (self.tax_rate_percent * 100.0).round() as i64,
            tax_shipping: self.tax_shipping,
        };
        Ok(StoreSettings {
            currency,
            shipping_enabled: self.shipping_enabled,
            tax,
        })
    }
}
