//! Product type.

use crate::ids::{ProductId, TermId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name (may contain markup).
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Current price.
    pub price: Money,
    /// Physical products need shipping; virtual and downloadable ones don't.
    pub needs_shipping: bool,
    /// Whether the product can be added to a cart at all.
    pub purchasable: bool,
    /// Units in stock. `None` means stock is not managed.
    pub stock_quantity: Option<i64>,
    /// Categories this product belongs to.
    pub category_ids: Vec<TermId>,
}

impl Product {
    /// Create a purchasable, shippable product with unmanaged stock.
    pub fn new(id: u64, name: impl Into<String>, price: Money) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: ProductId(id),
            name,
            slug,
            sku: String::new(),
            price,
            needs_shipping: true,
            purchasable: true,
            stock_quantity: None,
            category_ids: Vec::new(),
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    pub fn with_stock(mut self, quantity: i64) -> Self {
        self.stock_quantity = Some(quantity);
        self
    }

    pub fn virtual_product(mut self) -> Self {
        self.needs_shipping = false;
        self
    }

    pub fn in_categories(mut self, ids: &[u64]) -> Self {
        self.category_ids = ids.iter().copied().map(TermId).collect();
        self
    }

    /// Whether `quantity` units can be sold.
    pub fn has_enough_stock(&self, quantity: i64) -> bool {
        self.stock_quantity.map_or(true, |available| quantity <= available)
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_slug_from_name() {
        let p = Product::new(1, "Rust Programming Book!", Money::new(4999, Currency::USD));
        assert_eq!(p.slug, "rust-programming-book");
    }

    #[test]
    fn test_stock_check() {
        let p = Product::new(1, "Mug", Money::new(900, Currency::USD)).with_stock(3);
        assert!(p.has_enough_stock(3));
        assert!(!p.has_enough_stock(4));

        let unmanaged = Product::new(2, "Poster", Money::new(900, Currency::USD));
        assert!(unmanaged.has_enough_stock(10_000));
    }
}
