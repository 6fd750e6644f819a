//! Cart and line item types.

use crate::cart::{normalize_code, CartTotals, Coupon, CouponKind, TaxPolicy};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{ItemKey, ProductId};
use crate::money::{Currency, Money};
use crate::shipping::{ShippingDestination, ShippingPackage};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A shopping cart.
///
/// Everything derived (line subtotals, coupon discounts, package rates and
/// totals) is private and only written by the methods that recompute it.
/// Mutating methods validate first and change state last, so an `Err` leaves
/// the cart exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Cart currency.
    pub currency: Currency,
    items: Vec<LineItem>,
    coupons: Vec<AppliedCoupon>,
    destination: Option<ShippingDestination>,
    packages: Vec<ShippingPackage>,
    totals: CartTotals,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        let now = current_timestamp();
        Self {
            currency,
            items: Vec::new(),
            coupons: Vec::new(),
            destination: None,
            packages: Vec::new(),
            totals: CartTotals::zero(currency),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, key: &ItemKey) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Add a product to the cart.
    ///
    /// Adding a product/variation pair that is already in the cart increases
    /// that line's quantity and returns its existing key.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        variation: Vec<VariationAttribute>,
    ) -> Result<ItemKey, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if !product.purchasable {
            return Err(CommerceError::ProductNotPurchasable(product.name.clone()));
        }
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        let existing = self
            .items
            .iter()
            .position(|i| i.product_id == product.id && i.variation == variation);

        let new_quantity = match existing {
            Some(idx) => self.items[idx]
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?,
            None => quantity,
        };
        check_quantity(product, new_quantity)?;

        let key = match existing {
            Some(idx) => {
                let item = &mut self.items[idx];
                let line_subtotal = item.subtotal_for(new_quantity)?;
                item.quantity = new_quantity;
                item.line_subtotal = line_subtotal;
                item.key.clone()
            }
            None => {
                let item = LineItem::new(product, quantity, variation)?;
                let key = item.key.clone();
                self.items.push(item);
                key
            }
        };

        self.touch();
        Ok(key)
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn set_item_quantity(
        &mut self,
        key: &ItemKey,
        quantity: i64,
        product: &Product,
    ) -> Result<(), CommerceError> {
        if quantity < 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let idx = self
            .items
            .iter()
            .position(|i| &i.key == key)
            .ok_or_else(|| CommerceError::CartItemNotFound(key.to_string()))?;

        if quantity == 0 {
            self.items.remove(idx);
            self.touch();
            return Ok(());
        }

        check_quantity(product, quantity)?;
        let line_subtotal = self.items[idx].subtotal_for(quantity)?;
        let item = &mut self.items[idx];
        item.quantity = quantity;
        item.line_subtotal = line_subtotal;
        self.touch();
        Ok(())
    }

    /// Remove a line item.
    pub fn remove_item(&mut self, key: &ItemKey) -> Result<LineItem, CommerceError> {
        let idx = self
            .items
            .iter()
            .position(|i| &i.key == key)
            .ok_or_else(|| CommerceError::CartItemNotFound(key.to_string()))?;
        let item = self.items.remove(idx);
        self.touch();
        Ok(item)
    }

    /// Remove all items and coupons.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupons.clear();
        self.touch();
    }

    pub fn coupons(&self) -> &[AppliedCoupon] {
        &self.coupons
    }

    pub fn has_coupon(&self, code: &str) -> bool {
        let code = normalize_code(code);
        self.coupons.iter().any(|c| c.coupon.code == code)
    }

    /// Apply a coupon. Its discount is computed by the next totals calculation.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Result<(), CommerceError> {
        if !coupon.active {
            return Err(CommerceError::CouponNotFound(coupon.code));
        }
        if self.has_coupon(&coupon.code) {
            return Err(CommerceError::CouponAlreadyApplied(coupon.code));
        }
        let subtotal = self.items_subtotal()?;
        if !coupon.is_satisfied_by(&subtotal) {
            let reason = match &coupon.minimum_spend {
                Some(min) => format!("the minimum spend is {}", min),
                None => "conditions not met".to_string(),
            };
            return Err(CommerceError::CouponNotApplicable {
                code: coupon.code,
                reason,
            });
        }
        self.coupons.push(AppliedCoupon {
            discount: Money::zero(self.currency),
            coupon,
        });
        self.touch();
        Ok(())
    }

    /// Remove an applied coupon.
    pub fn remove_coupon(&mut self, code: &str) -> Result<(), CommerceError> {
        let normalized = normalize_code(code);
        let idx = self
            .coupons
            .iter()
            .position(|c| c.coupon.code == normalized)
            .ok_or(CommerceError::CouponNotApplied(normalized))?;
        self.coupons.remove(idx);
        self.touch();
        Ok(())
    }

    pub fn destination(&self) -> Option<&ShippingDestination> {
        self.destination.as_ref()
    }

    /// Change where the cart ships to.
    pub fn set_destination(&mut self, destination: ShippingDestination) {
        self.destination = Some(destination.normalized());
        self.touch();
    }

    /// Whether any line needs shipping.
    pub fn needs_shipping(&self) -> bool {
        self.items.iter().any(|i| i.needs_shipping)
    }

    pub fn packages(&self) -> &[ShippingPackage] {
        &self.packages
    }

    pub fn package(&self, package_id: u32) -> Option<&ShippingPackage> {
        self.packages.iter().find(|p| p.package_id == package_id)
    }

    /// Select a rate for a package.
    ///
    /// Fails if the package does not exist, if its rates were invalidated by a
    /// later cart change, or if `rate_id` is not one of its candidates.
    pub fn select_shipping_rate(
        &mut self,
        package_id: u32,
        rate_id: &str,
    ) -> Result<(), CommerceError> {
        let package = self
            .packages
            .iter_mut()
            .find(|p| p.package_id == package_id)
            .ok_or(CommerceError::InvalidPackage(package_id))?;
        if package.is_stale() {
            return Err(CommerceError::StaleShippingRates(package_id));
        }
        if package.rate(rate_id).is_none() {
            return Err(CommerceError::InvalidRate {
                package_id,
                rate_id: rate_id.to_string(),
            });
        }
        package.select_unchecked(rate_id);
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Replace the packages with freshly rated ones.
    ///
    /// A package keeps its previous selection when that rate is still
    /// offered; otherwise its first candidate is selected.
    pub fn replace_packages(&mut self, mut packages: Vec<ShippingPackage>) {
        for package in &mut packages {
            let previous = self
                .package(package.package_id)
                .and_then(|p| p.selected_rate());
            package.adopt_selection(previous);
        }
        self.packages = packages;
    }

    /// Re-derive line subtotals, coupon discounts and totals.
    ///
    /// Computes into locals and assigns at the end; calling it twice with no
    /// change in between yields identical totals.
    pub fn calculate_totals(&mut self, tax: &TaxPolicy) -> Result<&CartTotals, CommerceError> {
        let currency = self.currency;
        let subtotal = self.items_subtotal()?;

        let mut remaining = subtotal;
        let mut free_shipping = false;
        let mut discounts = Vec::with_capacity(self.coupons.len());
        for applied in &self.coupons {
            let coupon = &applied.coupon;
            if !coupon.is_satisfied_by(&subtotal) {
                discounts.push(Money::zero(currency));
                continue;
            }
            if coupon.kind == CouponKind::FreeShipping {
                free_shipping = true;
            }
            let discount = coupon.discount_on(&remaining).ok_or(CommerceError::Overflow)?;
            remaining = remaining
                .try_subtract(&discount)
                .ok_or(CommerceError::Overflow)?;
            discounts.push(discount);
        }
        let discount_total = subtotal
            .try_subtract(&remaining)
            .ok_or(CommerceError::Overflow)?;

        let shipping_total = if free_shipping {
            Money::zero(currency)
        } else {
            let selected: Vec<Money> = self
                .packages
                .iter()
                .filter_map(|p| p.selected().map(|r| r.cost))
                .collect();
            Money::try_sum(selected.iter(), currency).ok_or(CommerceError::Overflow)?
        };

        let taxable = if tax.tax_shipping {
            remaining
                .try_add(&shipping_total)
                .ok_or(CommerceError::Overflow)?
        } else {
            remaining
        };
        let tax_total = taxable
            .try_basis_points(tax.rate_basis_points)
            .ok_or(CommerceError::Overflow)?;

        let total = remaining
            .try_add(&shipping_total)
            .and_then(|m| m.try_add(&tax_total))
            .ok_or(CommerceError::Overflow)?;

        for (applied, discount) in self.coupons.iter_mut().zip(discounts) {
            applied.discount = discount;
        }
        self.totals = CartTotals {
            subtotal,
            discount_total,
            shipping_total,
            tax_total,
            total,
        };
        Ok(&self.totals)
    }

    /// Totals as of the last [`Cart::calculate_totals`] call.
    pub fn totals(&self) -> &CartTotals {
        &self.totals
    }

    fn items_subtotal(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.line_subtotal), self.currency)
            .ok_or(CommerceError::Overflow)
    }

    fn touch(&mut self) {
        for package in &mut self.packages {
            package.mark_stale();
        }
        self.updated_at = current_timestamp();
    }
}

/// A selected variation attribute (e.g. "Size" = "L").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariationAttribute {
    pub attribute: String,
    pub value: String,
}

impl VariationAttribute {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Cart-unique key.
    pub key: ItemKey,
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub line_subtotal: Money,
    pub variation: Vec<VariationAttribute>,
    pub needs_shipping: bool,
}

impl LineItem {
    fn new(
        product: &Product,
        quantity: i64,
        variation: Vec<VariationAttribute>,
    ) -> Result<Self, CommerceError> {
        let line_subtotal = product
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            key: ItemKey::generate(),
            product_id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            quantity,
            unit_price: product.price,
            line_subtotal,
            variation,
            needs_shipping: product.needs_shipping,
        })
    }

    fn subtotal_for(&self, quantity: i64) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// A coupon applied to the cart and the discount it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    pub coupon: Coupon,
    discount: Money,
}

impl AppliedCoupon {
    /// Discount as of the last totals calculation.
    pub fn discount(&self) -> Money {
        self.discount
    }
}

fn check_quantity(product: &Product, quantity: i64) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    if !product.has_enough_stock(quantity) {
        return Err(CommerceError::InsufficientStock {
            product: product.name.clone(),
            requested: quantity,
            available: product.stock_quantity.unwrap_or_default(),
        });
    }
    Ok(())
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
