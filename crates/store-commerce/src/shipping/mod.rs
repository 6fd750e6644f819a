//! Shipping packages, rates and rate calculation.

mod destination;
mod engine;
mod package;

pub use destination::ShippingDestination;
pub use engine::{PackageContents, RateRule, ShippingEngine, TableRateShipping};
pub use package::{ShippingPackage, ShippingRate};
