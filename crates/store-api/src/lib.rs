//! Store API: the REST surface over carts, categories and checkout.
//!
//! A [`Router`] owns a set of [`Route`]s and a [`CartController`]. Each
//! request runs one sequential pipeline: match, validate arguments, check the
//! route's capability, run the handler, serialize. Cart routes work on a
//! working copy of the session's cart and commit it only when the whole
//! pipeline succeeded.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use store_api::{routes, CartController, Router, StoreSettings};
//! use store_commerce::catalog::MemoryCatalog;
//! use store_commerce::payment::ManualGateway;
//! use store_session::{Cache, SessionCartStore};
//!
//! let controller = CartController::new(
//!     StoreSettings::default(),
//!     Arc::new(SessionCartStore::new(Cache::new())),
//!     Arc::new(MemoryCatalog::new()),
//! );
//! let mut router = Router::new(Arc::new(controller));
//! for route in routes::store_routes(Arc::new(ManualGateway::offline())) {
//!     router.register(route);
//! }
//!
//! let request = http::Request::get("/cart").body(Vec::new()).unwrap();
//! let response = router.dispatch(request);
//! assert_eq!(response.status(), 200);
//! assert!(response.headers().contains_key("cart-token"));
//! ```

pub mod args;
pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod route;
pub mod router;
pub mod routes;
pub mod schema;

pub use args::{ArgKind, ArgSchema, ArgSpec, Args};
pub use auth::{AllowAll, AuthRequest, Authorizer, DenyAll};
pub use config::{ConfigError, StoreSection, StoreSettings};
pub use controller::CartController;
pub use error::{ErrorKind, RouteError};
pub use route::{Route, RouteBody, RouteContext, RouteOutput};
pub use router::{ResponseFilter, RouteMatch, Router, CART_TOKEN_HEADER, REQUEST_ID_HEADER};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CartController, Route, RouteContext, RouteError, RouteOutput, Router, StoreSettings,
    };
}
