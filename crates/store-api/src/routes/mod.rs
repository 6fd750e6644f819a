//! The Store API route set.

mod cart;
mod cart_items;
mod categories;
mod checkout;

pub use cart::{
    AddItem, ApplyCoupon, GetCart, RemoveCoupon, RemoveItem, SelectShippingRate, UpdateItem,
    UpdateShipping,
};
pub use cart_items::{DeleteItems, GetItem, ListCoupons, ListItems};
pub use categories::{GetCategory, ListCategories};
pub use checkout::Checkout;

use crate::route::Route;
use std::sync::Arc;
use store_commerce::payment::PaymentGateway;

/// Every Store API route, in registration order.
pub fn store_routes(gateway: Arc<dyn PaymentGateway>) -> Vec<Arc<dyn Route>> {
    vec![
        Arc::new(GetCart),
        Arc::new(AddItem),
        Arc::new(RemoveItem),
        Arc::new(UpdateItem),
        Arc::new(ApplyCoupon),
        Arc::new(RemoveCoupon),
        Arc::new(UpdateShipping),
        Arc::new(SelectShippingRate),
        Arc::new(ListItems),
        Arc::new(GetItem),
        Arc::new(DeleteItems),
        Arc::new(ListCoupons),
        Arc::new(ListCategories),
        Arc::new(GetCategory),
        Arc::new(Checkout::new(gateway)),
    ]
}
