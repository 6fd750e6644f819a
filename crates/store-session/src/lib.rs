//! Session-scoped storage for the store.
//!
//! A [`Cache`] holds JSON-serialized values, [`Session`] layers versioned
//! per-session records on top, and [`SessionCartStore`] keeps one cart per
//! session.
//!
//! # Example
//!
//! ```rust
//! use store_session::{Cache, Session, SessionId};
//!
//! let session = Session::<Vec<String>>::new(Cache::new(), "viewed");
//! let id = SessionId::generate();
//!
//! let version = session.set_versioned(&id, &vec!["hoodie".to_string()], 0).unwrap();
//! assert_eq!(version, 1);
//!
//! // A second writer that also read version 0 loses.
//! assert!(session.set_versioned(&id, &Vec::new(), 0).is_err());
//! assert_eq!(session.get_versioned(&id).unwrap().unwrap().data.len(), 1);
//! ```

mod cart_store;
mod error;
mod kv;
mod session;

pub use cart_store::{CartRecord, CartStore, SessionCartStore};
pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Cache, CacheError, CartRecord, CartStore, Session, SessionCartStore, SessionId,
    };
}
