//! Shared fixtures for the router integration tests.

#![allow(dead_code)]

use http::{Request, Response};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use store_api::{routes, CartController, Router, StoreSettings};
use store_commerce::cart::{Cart, Coupon, MemoryCoupons};
use store_commerce::catalog::{MemoryCatalog, Product, Term};
use store_commerce::money::{Currency, Money};
use store_commerce::payment::ManualGateway;
use store_commerce::shipping::{RateRule, ShippingEngine, TableRateShipping};
use store_session::{Cache, CacheError, CartRecord, CartStore, SessionCartStore, SessionId};

pub const HOODIE: u64 = 1;
pub const EBOOK: u64 = 2;
pub const POSTER: u64 = 3;

pub fn usd(amount: i64) -> Money {
    Money::new(amount, Currency::USD)
}

pub fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_product(Product::new(HOODIE, "Hoodie", usd(4000)).with_sku("HD-1").with_stock(10))
        .with_product(Product::new(EBOOK, "E-book", usd(900)).virtual_product())
        .with_product(Product::new(POSTER, "Poster", usd(1200)))
        .with_category(Term::new(10, 0, "Clothing").with_count(4))
        .with_category(Term::new(11, 10, "Hoodies").with_count(2))
        .with_category(Term::new(12, 10, "Empty shelf"))
        .with_category(Term::new(13, 0, "Music").with_count(1))
}

pub fn table_rates() -> TableRateShipping {
    TableRateShipping::default()
        .with_rule(RateRule::new("flat_rate", "Flat rate", usd(500)))
        .with_rule(RateRule::new("free_shipping", "Free shipping", usd(0)))
}

/// Records every write so tests can assert nothing was committed.
pub struct SpyCartStore {
    inner: SessionCartStore,
    read_delay: Duration,
    pub puts: Mutex<Vec<SessionId>>,
}

impl SpyCartStore {
    pub fn new() -> Self {
        Self {
            inner: SessionCartStore::new(Cache::new()),
            read_delay: Duration::ZERO,
            puts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep after every read, widening the window between load and commit.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }
}

impl CartStore for SpyCartStore {
    fn get(&self, session: &SessionId) -> Result<Option<CartRecord>, CacheError> {
        let record = self.inner.get(session);
        if !self.read_delay.is_zero() {
            thread::sleep(self.read_delay);
        }
        record
    }

    fn put(&self, session: &SessionId, cart: &Cart, expected: u64) -> Result<u64, CacheError> {
        let version = self.inner.put(session, cart, expected)?;
        self.puts.lock().unwrap().push(session.clone());
        Ok(version)
    }

    fn delete(&self, session: &SessionId) -> Result<(), CacheError> {
        self.inner.delete(session)
    }
}

pub struct Harness {
    pub router: Router,
    pub carts: Arc<SpyCartStore>,
    pub session: SessionId,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(StoreSettings::default(), Arc::new(table_rates()))
    }

    pub fn with(settings: StoreSettings, shipping: Arc<dyn ShippingEngine>) -> Self {
        Self::assemble(settings, shipping, SpyCartStore::new(), catalog())
    }

    pub fn assemble(
        settings: StoreSettings,
        shipping: Arc<dyn ShippingEngine>,
        carts: SpyCartStore,
        catalog: MemoryCatalog,
    ) -> Self {
        let carts = Arc::new(carts);
        let coupons = MemoryCoupons::new()
            .with_coupon(Coupon::percent("half", 5000))
            .with_coupon(Coupon::free_shipping("shipfree"));
        let controller = CartController::new(settings, carts.clone(), Arc::new(catalog))
            .with_shipping(shipping)
            .with_coupons(Arc::new(coupons));
        let mut router = Router::new(Arc::new(controller));
        for route in routes::store_routes(Arc::new(ManualGateway::offline())) {
            router.register(route);
        }
        Self {
            router,
            carts,
            session: SessionId::new("sess_test"),
        }
    }

    pub fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response<Vec<u8>> {
        let body = body.map(|b| b.to_string().into_bytes()).unwrap_or_default();
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("cart-token", self.session.as_str())
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        self.router.dispatch(request)
    }

    /// Dispatch and decode the JSON body.
    pub fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (u16, Value) {
        let response = self.request(method, uri, body);
        let status = response.status().as_u16();
        let body = serde_json::from_slice(response.body()).unwrap();
        (status, body)
    }

    pub fn stored_cart(&self) -> Option<Cart> {
        self.carts.get(&self.session).unwrap().map(|record| record.cart)
    }
}
