//! Shipping destination.

use serde::{Deserialize, Serialize};

/// Where a package is shipped. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingDestination {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    /// ISO 3166-1 alpha-2 country code, upper case.
    pub country: String,
}

impl ShippingDestination {
    /// Destination with only a country set.
    pub fn country(code: impl Into<String>) -> Self {
        Self {
            country: code.into().to_uppercase(),
            ..Self::default()
        }
    }

    /// Normalise codes to upper case and trim every field.
    pub fn normalized(self) -> Self {
        Self {
            address_1: self.address_1.trim().to_string(),
            address_2: self.address_2.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_uppercase(),
            postcode: self.postcode.trim().to_uppercase(),
            country: self.country.trim().to_uppercase(),
        }
    }

    pub fn has_country(&self) -> bool {
        !self.country.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        let d = ShippingDestination {
            country: " us ".into(),
            state: "ca".into(),
            postcode: " 94103".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(d.country, "US");
        assert_eq!(d.state, "CA");
        assert_eq!(d.postcode, "94103");
        assert!(d.has_country());
    }
}
