//! Shipping packages and their candidate rates.

use crate::ids::ItemKey;
use crate::money::Money;
use crate::shipping::ShippingDestination;
use serde::{Deserialize, Serialize};

/// A named shipping option with a cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingRate {
    /// Rate id, unique within a package (e.g. "flat_rate:1").
    pub rate_id: String,
    /// Display name.
    pub name: String,
    /// Shipping method this rate came from (e.g. "flat_rate").
    pub method_id: String,
    /// Cost of the rate.
    pub cost: Money,
    /// Minimum delivery days.
    pub min_delivery_days: Option<u32>,
    /// Maximum delivery days.
    pub max_delivery_days: Option<u32>,
}

impl ShippingRate {
    pub fn new(rate_id: impl Into<String>, name: impl Into<String>, cost: Money) -> Self {
        let rate_id = rate_id.into();
        let method_id = rate_id
            .split(':')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            rate_id,
            name: name.into(),
            method_id,
            cost,
            min_delivery_days: None,
            max_delivery_days: None,
        }
    }

    pub fn with_delivery_days(mut self, min: u32, max: u32) -> Self {
        self.min_delivery_days = Some(min);
        self.max_delivery_days = Some(max);
        self
    }

    /// Human-readable delivery estimate.
    pub fn delivery_estimate(&self) -> Option<String> {
        match (self.min_delivery_days, self.max_delivery_days) {
            (Some(min), Some(max)) if min == max => Some(format!("{} days", min)),
            (Some(min), Some(max)) => Some(format!("{}-{} days", min, max)),
            (Some(min), None) => Some(format!("{}+ days", min)),
            (None, Some(max)) => Some(format!("Up to {} days", max)),
            (None, None) => None,
        }
    }
}

/// A shippable group of cart items with its candidate rates.
///
/// The selected rate is private: it only changes through
/// [`Cart::select_shipping_rate`](crate::cart::Cart::select_shipping_rate) or a
/// shipping recalculation, both of which check membership in `rates`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingPackage {
    /// Package identifier, stable for a given cart layout.
    pub package_id: u32,
    /// Display name (e.g. "Shipment 1").
    pub name: String,
    /// Where the package goes.
    pub destination: ShippingDestination,
    /// Line items in this package.
    pub item_keys: Vec<ItemKey>,
    /// Candidate rates, in display order.
    pub rates: Vec<ShippingRate>,
    selected_rate: Option<String>,
    stale: bool,
}

impl ShippingPackage {
    pub fn new(
        package_id: u32,
        name: impl Into<String>,
        destination: ShippingDestination,
        item_keys: Vec<ItemKey>,
        rates: Vec<ShippingRate>,
    ) -> Self {
        Self {
            package_id,
            name: name.into(),
            destination,
            item_keys,
            rates,
            selected_rate: None,
            stale: false,
        }
    }

    /// Currently selected rate id.
    pub fn selected_rate(&self) -> Option<&str> {
        self.selected_rate.as_deref()
    }

    /// Currently selected rate.
    pub fn selected(&self) -> Option<&ShippingRate> {
        let id = self.selected_rate.as_deref()?;
        self.rate(id)
    }

    /// Look up a candidate rate by id.
    pub fn rate(&self, rate_id: &str) -> Option<&ShippingRate> {
        self.rates.iter().find(|r| r.rate_id == rate_id)
    }

    /// Whether a cart change invalidated the rates.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Select a rate that is known to be a candidate.
    pub(crate) fn select_unchecked(&mut self, rate_id: &str) {
        self.selected_rate = Some(rate_id.to_string());
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Carry over a previous selection if it is still offered, else pick the
    /// first candidate.
    pub(crate) fn adopt_selection(&mut self, previous: Option<&str>) {
        self.selected_rate = match previous {
            Some(id) if self.rate(id).is_some() => Some(id.to_string()),
            _ => self.rates.first().map(|r| r.rate_id.clone()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn package() -> ShippingPackage {
        ShippingPackage::new(
            0,
            "Shipment 1",
            ShippingDestination::default(),
            vec![],
            vec![
                ShippingRate::new("flat_rate", "Flat rate", Money::new(500, Currency::USD)),
                ShippingRate::new("free_shipping", "Free", Money::zero(Currency::USD)),
            ],
        )
    }

    #[test]
    fn test_adopt_keeps_valid_selection() {
        let mut p = package();
        p.adopt_selection(Some("free_shipping"));
        assert_eq!(p.selected_rate(), Some("free_shipping"));
    }

    #[test]
    fn test_adopt_falls_back_to_first_rate() {
        let mut p = package();
        p.adopt_selection(Some("gone"));
        assert_eq!(p.selected_rate(), Some("flat_rate"));

        let mut empty = ShippingPackage::new(1, "x", ShippingDestination::default(), vec![], vec![]);
        empty.adopt_selection(Some("flat_rate"));
        assert_eq!(empty.selected_rate(), None);
    }

    #[test]
    fn test_method_id_derived_from_rate_id() {
        let rate = ShippingRate::new("flat_rate:3", "Flat", Money::new(1, Currency::USD));
        assert_eq!(rate.method_id, "flat_rate");
    }

    #[test]
    fn test_delivery_estimate() {
        let rate = ShippingRate::new("x", "X", Money::zero(Currency::USD)).with_delivery_days(3, 5);
        assert_eq!(rate.delivery_estimate(), Some("3-5 days".to_string()));
    }
}
