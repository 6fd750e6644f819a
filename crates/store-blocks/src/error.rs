//! Block rendering errors.

use store_api::RouteError;
use store_commerce::CommerceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockError {
    /// The catalog could not be read.
    #[error(transparent)]
    Catalog(#[from] CommerceError),

    /// The cart could not be loaded.
    #[error(transparent)]
    Cart(#[from] RouteError),
}
