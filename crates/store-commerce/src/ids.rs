//! Newtype IDs for type-safe identifiers.
//!
//! Catalog entities use numeric ids (they come from the catalog store), cart
//! entities use opaque string keys generated here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates an opaque string key type.
macro_rules! define_key {
    ($name:ident, $prefix:literal) => {
        /// An opaque string key.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a key from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh key.
            pub fn generate() -> Self {
                Self(format!("{}{}", $prefix, generate_id()))
            }

            /// Get the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Generates a numeric id type.
macro_rules! define_numeric_id {
    ($name:ident) => {
        /// A numeric catalog identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }
    };
}

define_key!(ItemKey, "item_");
define_key!(OrderId, "order_");

define_numeric_id!(ProductId);
define_numeric_id!(TermId);

/// Generate a unique hex id from the clock and a process-wide counter.
fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

    format!("{:x}{:04x}", timestamp, counter & 0xffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation_is_unique() {
        let a = ItemKey::generate();
        let b = ItemKey::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("item_"));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let key = ItemKey::new("item_abc");
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""item_abc""#);
    }

    #[test]
    fn test_numeric_id_roundtrip() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId(42));
        assert_eq!(id.to_string(), "42");
    }
}
