//! Catalog collaborator.

use crate::catalog::{Product, Term};
use crate::error::CommerceError;
use crate::ids::{ProductId, TermId};
use std::collections::BTreeMap;

/// Read access to products and category terms.
pub trait CatalogStore: Send + Sync {
    /// Fetch a product, `Ok(None)` if it does not exist.
    fn get_product(&self, id: ProductId) -> Result<Option<Product>, CommerceError>;

    /// All product category terms, flat, in catalog order.
    fn categories(&self) -> Result<Vec<Term>, CommerceError>;

    /// Fetch a single category term.
    fn get_category(&self, id: TermId) -> Result<Option<Term>, CommerceError> {
        Ok(self.categories()?.into_iter().find(|t| t.id == id))
    }
}

/// In-memory catalog, populated up front.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: BTreeMap<ProductId, Product>,
    categories: Vec<Term>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id, product);
        self
    }

    pub fn with_category(mut self, term: Term) -> Self {
        self.categories.push(term);
        self
    }
}

impl CatalogStore for MemoryCatalog {
    fn get_product(&self, id: ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.products.get(&id).cloned())
    }

    fn categories(&self) -> Result<Vec<Term>, CommerceError> {
        Ok(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    #[test]
    fn test_memory_catalog_lookup() {
        let catalog = MemoryCatalog::new()
            .with_product(Product::new(10, "Cap", Money::new(1500, Currency::USD)))
            .with_category(Term::new(3, 0, "Hats"));

        assert!(catalog.get_product(ProductId(10)).unwrap().is_some());
        assert!(catalog.get_product(ProductId(11)).unwrap().is_none());
        assert_eq!(catalog.get_category(TermId(3)).unwrap().unwrap().name, "Hats");
        assert!(catalog.get_category(TermId(4)).unwrap().is_none());
    }
}
