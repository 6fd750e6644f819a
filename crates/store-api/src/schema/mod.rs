//! Response schemas.
//!
//! A schema knows its title and property list, and turns one domain value
//! into its JSON response form. Schemas are pure: no I/O, no mutation.

mod cart;
mod checkout;
mod term;

pub use cart::{CartCouponSchema, CartItemSchema, CartSchema, ShippingPackageSchema, TotalsSchema};
pub use checkout::{CheckoutResult, CheckoutSchema};
pub use term::{CategoryTreeSchema, TermSchema};

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use store_commerce::money::{Currency, Money};

const VIEW_EDIT: &[&str] = &["view", "edit"];

/// JSON type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Integer,
    String,
    Boolean,
    Array,
    Object,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Integer => "integer",
            PropertyKind::String => "string",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Array => "array",
            PropertyKind::Object => "object",
        }
    }
}

/// One property of a schema.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    pub kind: PropertyKind,
    pub description: &'static str,
    pub context: &'static [&'static str],
    pub readonly: bool,
    /// Element schema for arrays.
    pub items: Option<Box<PropertySchema>>,
    /// Nested properties for objects.
    pub properties: BTreeMap<&'static str, PropertySchema>,
}

impl PropertySchema {
    fn new(kind: PropertyKind, description: &'static str) -> Self {
        Self {
            kind,
            description,
            context: VIEW_EDIT,
            readonly: true,
            items: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn integer(description: &'static str) -> Self {
        Self::new(PropertyKind::Integer, description)
    }

    pub fn string(description: &'static str) -> Self {
        Self::new(PropertyKind::String, description)
    }

    pub fn boolean(description: &'static str) -> Self {
        Self::new(PropertyKind::Boolean, description)
    }

    pub fn array(description: &'static str, items: PropertySchema) -> Self {
        let mut schema = Self::new(PropertyKind::Array, description);
        schema.items = Some(Box::new(items));
        schema
    }

    pub fn object(
        description: &'static str,
        properties: BTreeMap<&'static str, PropertySchema>,
    ) -> Self {
        let mut schema = Self::new(PropertyKind::Object, description);
        schema.properties = properties;
        schema
    }

    /// Clients may send this property.
    pub fn writable(mut self) -> Self {
        self.readonly = false;
        self
    }

    /// JSON-Schema form.
    pub fn to_json(&self) -> Value {
        let mut out = json!({
            "description": self.description,
            "type": self.kind.as_str(),
            "context": self.context,
            "readonly": self.readonly,
        });
        if let Some(items) = &self.items {
            out["items"] = items.to_json();
        }
        if !self.properties.is_empty() {
            out["properties"] = properties_json(&self.properties);
        }
        out
    }
}

fn properties_json(properties: &BTreeMap<&'static str, PropertySchema>) -> Value {
    let map: Map<String, Value> = properties
        .iter()
        .map(|(name, prop)| (name.to_string(), prop.to_json()))
        .collect();
    Value::Object(map)
}

/// Describes and serializes one kind of response item.
pub trait Schema {
    type Item: ?Sized;

    /// Schema item name.
    fn title(&self) -> &'static str;

    fn properties(&self) -> BTreeMap<&'static str, PropertySchema>;

    /// Response form of one item.
    fn item_response(&self, item: &Self::Item) -> Value;

    /// JSON-Schema document for the item, served on OPTIONS requests.
    fn public_item_schema(&self) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "title": self.title(),
            "type": "object",
            "properties": properties_json(&self.properties()),
        })
    }
}

/// Escape user-authored text before it goes into a response.
pub fn prepare_html_response(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Currency fields shared by every money-carrying object.
pub(crate) fn currency_fields(currency: Currency) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("currency_code".into(), json!(currency.code()));
    map.insert("currency_symbol".into(), json!(currency.symbol()));
    map.insert("currency_minor_unit".into(), json!(currency.minor_unit()));
    map
}

/// Money as an integer in minor units.
pub(crate) fn price(money: &Money) -> Value {
    json!(money.amount)
}

pub(crate) fn currency_properties() -> BTreeMap<&'static str, PropertySchema> {
    BTreeMap::from([
        ("currency_code", PropertySchema::string("Currency code (in ISO format) for returned prices.")),
        ("currency_symbol", PropertySchema::string("Currency symbol for the currency.")),
        (
            "currency_minor_unit",
            PropertySchema::integer("Currency minor unit (number of digits after the decimal separator)."),
        ),
    ])
}
