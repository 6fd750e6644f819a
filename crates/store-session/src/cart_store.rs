//! Cart persistence keyed by session.

use crate::{Cache, CacheError, Session, SessionId};
use store_commerce::cart::Cart;

/// A stored cart and the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub cart: Cart,
    /// 0 when nothing is stored for the session yet.
    pub version: u64,
}

impl CartRecord {
    /// A cart that has never been stored.
    pub fn unsaved(cart: Cart) -> Self {
        Self { cart, version: 0 }
    }
}

/// Where carts live between requests.
///
/// The API loads a working copy with `get` and commits it with `put` only
/// after a request succeeded. `put` must refuse the write when the stored
/// version moved on since `get`, which gives one writer per session.
pub trait CartStore: Send + Sync {
    fn get(&self, id: &SessionId) -> Result<Option<CartRecord>, CacheError>;

    /// Store `cart` if the stored version is still `expected`. Returns the
    /// new version, or [`CacheError::ConcurrentModification`].
    fn put(&self, id: &SessionId, cart: &Cart, expected: u64) -> Result<u64, CacheError>;

    fn delete(&self, id: &SessionId) -> Result<(), CacheError>;
}

/// [`CartStore`] backed by versioned [`Session`] records.
pub struct SessionCartStore {
    session: Session<Cart>,
}

impl SessionCartStore {
    pub fn new(cache: Cache) -> Self {
        Self {
            session: Session::new(cache, "cart"),
        }
    }
}

impl CartStore for SessionCartStore {
    fn get(&self, id: &SessionId) -> Result<Option<CartRecord>, CacheError> {
        Ok(self.session.get_versioned(id)?.map(|record| CartRecord {
            cart: record.data,
            version: record.version,
        }))
    }

    fn put(&self, id: &SessionId, cart: &Cart, expected: u64) -> Result<u64, CacheError> {
        let version = self.session.set_versioned(id, cart, expected)?;
        tracing::trace!(session = %id, version, "cart stored");
        Ok(version)
    }

    fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.session.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_commerce::catalog::Product;
    use store_commerce::money::{Currency, Money};

    fn scarf_cart() -> Cart {
        let mut cart = Cart::new(Currency::USD);
        let product = Product::new(5, "Scarf", Money::new(2200, Currency::USD));
        cart.add_item(&product, 2, vec![]).unwrap();
        cart
    }

    #[test]
    fn test_round_trip_preserves_cart() {
        let store = SessionCartStore::new(Cache::new());
        let id = SessionId::generate();
        assert!(store.get(&id).unwrap().is_none());

        let cart = scarf_cart();
        assert_eq!(store.put(&id, &cart, 0).unwrap(), 1);
        assert_eq!(store.put(&id, &cart, 1).unwrap(), 2);

        let record = store.get(&id).unwrap().unwrap();
        assert_eq!(record.cart, cart);
        assert_eq!(record.version, 2);

        store.delete(&id).unwrap();
        assert!(store.get(&id).unwrap().is_none());
    }

    #[test]
    fn test_put_from_stale_read_is_refused() {
        let store = SessionCartStore::new(Cache::new());
        let id = SessionId::generate();
        let first = store.get(&id).unwrap().map_or(0, |r| r.version);
        let second = first;

        store.put(&id, &scarf_cart(), first).unwrap();
        let err = store.put(&id, &Cart::new(Currency::USD), second).unwrap_err();
        assert!(matches!(err, CacheError::ConcurrentModification { expected: 0, found: 1, .. }));
        assert_eq!(store.get(&id).unwrap().unwrap().cart.item_count(), 2);
    }
}
