//! Store server: serves the Store API over HTTP with axum.

pub mod app;
pub mod config;
pub mod demo;

pub use app::build_app;
pub use config::StoreConfig;
