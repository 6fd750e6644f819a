//! Server-rendered storefront blocks.
//!
//! Blocks only read: they load carts through
//! [`CartController::get_cart_instance`](store_api::CartController::get_cart_instance)
//! and categories through the catalog, and produce HTML strings.

mod all_categories;
mod error;
mod handpicked;
mod mini_cart;

pub use all_categories::{render_all_categories, AllCategoriesOptions};
pub use error::BlockError;
pub use handpicked::{render_handpicked, HandpickedOptions};
pub use mini_cart::render_mini_cart;
