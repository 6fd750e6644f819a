//! Cart controller.
//!
//! Every operation works on a working copy of the cart that the route loaded
//! with [`CartController::load_cart`]. Operations validate before they
//! mutate, so a failed operation leaves the working copy unchanged. The route
//! commits the copy with [`CartController::save_cart`] only after its whole
//! pipeline succeeded, and the commit fails with `cart_conflict` if another
//! request committed first.

use crate::config::StoreSettings;
use crate::error::RouteError;
use std::sync::Arc;
use store_commerce::cart::{Cart, CartTotals, CouponStore, LineItem, MemoryCoupons, VariationAttribute};
use store_commerce::catalog::{CatalogStore, Product};
use store_commerce::ids::{ItemKey, ProductId};
use store_commerce::shipping::{ShippingDestination, ShippingEngine, ShippingPackage, TableRateShipping};
use store_commerce::CommerceError;
use store_session::{CartRecord, CartStore, SessionId};
use tracing::debug;

/// Cart operations over injected collaborators.
pub struct CartController {
    settings: StoreSettings,
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn CatalogStore>,
    shipping: Arc<dyn ShippingEngine>,
    coupons: Arc<dyn CouponStore>,
}

impl CartController {
    /// Controller with no shipping rates and no coupons configured.
    pub fn new(
        settings: StoreSettings,
        carts: Arc<dyn CartStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            settings,
            carts,
            catalog,
            shipping: Arc::new(TableRateShipping::default()),
            coupons: Arc::new(MemoryCoupons::new()),
        }
    }

    pub fn with_shipping(mut self, engine: Arc<dyn ShippingEngine>) -> Self {
        self.shipping = engine;
        self
    }

    pub fn with_coupons(mut self, coupons: Arc<dyn CouponStore>) -> Self {
        self.coupons = coupons;
        self
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    /// The session's cart, or a new empty one. Nothing is written.
    pub fn get_cart_instance(&self, session: &SessionId) -> Result<Cart, RouteError> {
        Ok(self.load_cart(session)?.cart)
    }

    /// Like [`get_cart_instance`](Self::get_cart_instance), keeping the
    /// stored version for [`save_cart`](Self::save_cart).
    pub fn load_cart(&self, session: &SessionId) -> Result<CartRecord, RouteError> {
        match self.carts.get(session)? {
            Some(record) => Ok(record),
            None => {
                debug!(session = %session, "new cart");
                Ok(CartRecord::unsaved(Cart::new(self.settings.currency)))
            }
        }
    }

    /// Commit a working copy loaded with [`load_cart`](Self::load_cart).
    pub fn save_cart(&self, session: &SessionId, record: &CartRecord) -> Result<(), RouteError> {
        let version = self.carts.put(session, &record.cart, record.version)?;
        debug!(session = %session, version, "cart committed");
        Ok(())
    }

    pub fn add_to_cart(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
        quantity: i64,
        variation: Vec<VariationAttribute>,
    ) -> Result<ItemKey, RouteError> {
        let product = self.product(product_id)?;
        let key = cart.add_item(&product, quantity, variation)?;
        debug!(product = %product_id, quantity, key = %key, "item added");
        Ok(key)
    }

    /// Set a line's quantity; zero removes it.
    pub fn set_cart_item_quantity(
        &self,
        cart: &mut Cart,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<(), RouteError> {
        let product_id = cart
            .item(key)
            .map(|item| item.product_id)
            .ok_or_else(|| CommerceError::CartItemNotFound(key.to_string()))?;
        let product = self.product(product_id)?;
        cart.set_item_quantity(key, quantity, &product)?;
        debug!(key = %key, quantity, "item quantity set");
        Ok(())
    }

    pub fn remove_cart_item(&self, cart: &mut Cart, key: &ItemKey) -> Result<LineItem, RouteError> {
        let item = cart.remove_item(key)?;
        debug!(key = %key, "item removed");
        Ok(item)
    }

    pub fn empty_cart(&self, cart: &mut Cart) {
        cart.clear();
        debug!("cart emptied");
    }

    pub fn apply_coupon(&self, cart: &mut Cart, code: &str) -> Result<(), RouteError> {
        let coupon = self
            .coupons
            .get_coupon(code)?
            .ok_or_else(|| CommerceError::CouponNotFound(code.to_string()))?;
        cart.apply_coupon(coupon)?;
        debug!(code, "coupon applied");
        Ok(())
    }

    pub fn remove_coupon(&self, cart: &mut Cart, code: &str) -> Result<(), RouteError> {
        cart.remove_coupon(code)?;
        debug!(code, "coupon removed");
        Ok(())
    }

    pub fn update_shipping_destination(&self, cart: &mut Cart, destination: ShippingDestination) {
        cart.set_destination(destination);
    }

    /// Choose a rate for one package.
    ///
    /// Fails with `shipping_disabled` when shipping is switched off, and with
    /// `invalid_package`, `stale_shipping_rates` or `invalid_rate` otherwise.
    pub fn select_shipping_rate(
        &self,
        cart: &mut Cart,
        package_id: u32,
        rate_id: &str,
    ) -> Result<(), RouteError> {
        if !self.settings.shipping_enabled {
            return Err(CommerceError::ShippingDisabled.into());
        }
        cart.select_shipping_rate(package_id, rate_id)?;
        debug!(package_id, rate_id, "shipping rate selected");
        Ok(())
    }

    /// Rebuild packages and their rates.
    ///
    /// Packages keep their previous selection while it is still offered.
    /// Carts that need no shipping, and stores with shipping off, end up with
    /// no packages.
    pub fn calculate_shipping(&self, cart: &mut Cart) -> Result<(), RouteError> {
        if !self.settings.shipping_enabled || !cart.needs_shipping() {
            cart.replace_packages(Vec::new());
            return Ok(());
        }
        let packages: Vec<ShippingPackage> = self
            .shipping
            .packages(cart)
            .into_iter()
            .map(|contents| {
                let rates = self.shipping.get_rates(&contents);
                let item_keys = contents.items.iter().map(|i| i.key.clone()).collect();
                ShippingPackage::new(
                    contents.package_id,
                    contents.name,
                    contents.destination,
                    item_keys,
                    rates,
                )
            })
            .collect();
        debug!(packages = packages.len(), "shipping calculated");
        cart.replace_packages(packages);
        Ok(())
    }

    pub fn calculate_totals(&self, cart: &mut Cart) -> Result<CartTotals, RouteError> {
        Ok(*cart.calculate_totals(&self.settings.tax)?)
    }

    /// Shipping, then totals.
    pub fn recalculate(&self, cart: &mut Cart) -> Result<CartTotals, RouteError> {
        self.calculate_shipping(cart)?;
        self.calculate_totals(cart)
    }

    /// Check that every line can still be bought as-is.
    pub fn validate_cart_for_checkout(&self, cart: &Cart) -> Result<(), RouteError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        for item in cart.items() {
            let product = self.product(item.product_id)?;
            if !product.purchasable {
                return Err(CommerceError::ProductNotPurchasable(product.name).into());
            }
            if !product.has_enough_stock(item.quantity) {
                return Err(CommerceError::InsufficientStock {
                    product: product.name,
                    requested: item.quantity,
                    available: product.stock_quantity.unwrap_or_default(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn product(&self, id: ProductId) -> Result<Product, RouteError> {
        self.catalog
            .get_product(id)?
            .ok_or_else(|| CommerceError::ProductNotFound(id.get()).into())
    }
}
