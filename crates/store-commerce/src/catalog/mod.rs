//! Product catalog module.
//!
//! Contains products, category terms, the category tree builder and the
//! [`CatalogStore`] collaborator the cart reads products through.

mod product;
mod store;
mod term;
mod tree;

pub use product::Product;
pub use store::{CatalogStore, MemoryCatalog};
pub use term::Term;
pub use tree::{
    build_category_tree, forest_depth, forest_len, select_categories, CategoryNode, CategoryQuery,
};
