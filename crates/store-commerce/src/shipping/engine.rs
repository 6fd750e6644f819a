//! Shipping rate calculation.

use crate::cart::{Cart, LineItem};
use crate::money::Money;
use crate::shipping::{ShippingDestination, ShippingRate};

/// Contents of one package, as handed to a [`ShippingEngine`].
#[derive(Debug, Clone)]
pub struct PackageContents {
    pub package_id: u32,
    pub name: String,
    pub destination: ShippingDestination,
    pub items: Vec<LineItem>,
}

impl PackageContents {
    /// Sum of line subtotals in the package.
    pub fn contents_cost(&self) -> Option<Money> {
        let currency = self.items.first().map(|i| i.unit_price.currency)?;
        Money::try_sum(self.items.iter().map(|i| &i.line_subtotal), currency)
    }
}

/// Splits a cart into packages and prices each one.
pub trait ShippingEngine: Send + Sync {
    /// Group shippable items into packages.
    ///
    /// The default puts every item that needs shipping into package 0.
    fn packages(&self, cart: &Cart) -> Vec<PackageContents> {
        let items: Vec<LineItem> = cart
            .items()
            .iter()
            .filter(|i| i.needs_shipping)
            .cloned()
            .collect();
        if items.is_empty() {
            return Vec::new();
        }
        vec![PackageContents {
            package_id: 0,
            name: "Shipment 1".to_string(),
            destination: cart.destination().cloned().unwrap_or_default(),
            items,
        }]
    }

    /// Candidate rates for a package, in display order.
    fn get_rates(&self, package: &PackageContents) -> Vec<ShippingRate>;
}

/// One row of a [`TableRateShipping`] table.
#[derive(Debug, Clone)]
pub struct RateRule {
    pub rate_id: String,
    pub name: String,
    pub cost: Money,
    /// Countries the rule applies to; empty means everywhere.
    pub countries: Vec<String>,
    /// Only offered when the package contents cost at least this much.
    pub min_amount: Option<Money>,
    pub delivery_days: Option<(u32, u32)>,
}

impl RateRule {
    pub fn new(rate_id: impl Into<String>, name: impl Into<String>, cost: Money) -> Self {
        Self {
            rate_id: rate_id.into(),
            name: name.into(),
            cost,
            countries: Vec::new(),
            min_amount: None,
            delivery_days: None,
        }
    }

    pub fn for_countries(mut self, countries: &[&str]) -> Self {
        self.countries = countries.iter().map(|c| c.to_uppercase()).collect();
        self
    }

    pub fn with_min_amount(mut self, min: Money) -> Self {
        self.min_amount = Some(min);
        self
    }

    pub fn with_delivery_days(mut self, min: u32, max: u32) -> Self {
        self.delivery_days = Some((min, max));
        self
    }

    fn applies_to(&self, package: &PackageContents) -> bool {
        if !self.countries.is_empty()
            && !self.countries.contains(&package.destination.country)
        {
            return false;
        }
        match (&self.min_amount, package.contents_cost()) {
            (Some(min), Some(cost)) => cost.currency == min.currency && cost.amount >= min.amount,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// Table-driven shipping: every rule that matches the destination and
/// contents becomes a candidate rate.
#[derive(Debug, Clone, Default)]
pub struct TableRateShipping {
    rules: Vec<RateRule>,
}

impl TableRateShipping {
    pub fn new(rules: Vec<RateRule>) -> Self {
        Self { rules }
    }

    pub fn with_rule(mut self, rule: RateRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl ShippingEngine for TableRateShipping {
    fn get_rates(&self, package: &PackageContents) -> Vec<ShippingRate> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(package))
            .map(|rule| {
                let rate = ShippingRate::new(rule.rate_id.clone(), rule.name.clone(), rule.cost);
                match rule.delivery_days {
                    Some((min, max)) => rate.with_delivery_days(min, max),
                    None => rate,
                }
            })
            .collect()
    }
}
