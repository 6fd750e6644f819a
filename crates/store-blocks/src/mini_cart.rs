//! Mini cart block: item count and total for the header.

use crate::error::BlockError;
use store_api::schema::prepare_html_response as html_escape;
use store_api::CartController;
use store_commerce::cart::Cart;
use store_session::SessionId;

/// Render the mini cart for a session. Reads the stored cart, never writes.
pub fn render_mini_cart(controller: &CartController, session: &SessionId) -> Result<String, BlockError> {
    let cart = controller.get_cart_instance(session)?;
    Ok(render_cart(&cart))
}

fn render_cart(cart: &Cart) -> String {
    let count = cart.item_count();
    let total = cart.totals().total;
    let label = if count == 1 { "item" } else { "items" };

    let items_html: String = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                r#"<li class="wc-block-mini-cart__item"><span class="wc-block-mini-cart__item-name">{}</span> <span class="wc-block-mini-cart__item-quantity">&times; {}</span> <span class="wc-block-mini-cart__item-price">{}</span></li>"#,
                html_escape(&item.name),
                item.quantity,
                html_escape(&item.line_subtotal.to_string())
            )
        })
        .collect();

    let contents = if cart.is_empty() {
        r#"<p class="wc-block-mini-cart__empty">Your cart is currently empty!</p>"#.to_string()
    } else {
        format!(r#"<ul class="wc-block-mini-cart__items">{}</ul>"#, items_html)
    };

    format!(
        r#"<div class="wc-block-mini-cart" data-count="{count}">
    <a class="wc-block-mini-cart__button" href="/cart" aria-label="{count} {label} in cart, total price of {total_text}">
        <span class="wc-block-mini-cart__amount">{total_text}</span>
        <span class="wc-block-mini-cart__badge">{count}</span>
    </a>
    <div class="wc-block-mini-cart__drawer">{contents}</div>
</div>"#,
        total_text = html_escape(&total.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use store_api::StoreSettings;
    use store_commerce::cart::TaxPolicy;
    use store_commerce::catalog::{MemoryCatalog, Product};
    use store_commerce::money::{Currency, Money};
    use store_session::{Cache, CartStore, SessionCartStore};

    #[test]
    fn test_renders_items_and_total() {
        let mut cart = Cart::new(Currency::USD);
        let product = Product::new(1, "Scarf <wool>", Money::new(2500, Currency::USD));
        cart.add_item(&product, 2, vec![]).unwrap();
        cart.calculate_totals(&TaxPolicy::none()).unwrap();

        let html = render_cart(&cart);
        assert!(html.contains(r#"data-count="2""#));
        assert!(html.contains("Scarf &lt;wool&gt;"));
        assert!(html.contains("&times; 2"));
        assert!(html.contains("$50.00"));
        assert!(html.contains("2 items in cart"));
    }

    #[test]
    fn test_empty_session_is_not_persisted() {
        let carts = Arc::new(SessionCartStore::new(Cache::new()));
        let controller = CartController::new(
            StoreSettings::default(),
            carts.clone(),
            Arc::new(MemoryCatalog::new()),
        );
        let session = SessionId::new("sess_visitor");

        let html = render_mini_cart(&controller, &session).unwrap();
        assert!(html.contains("Your cart is currently empty!"));
        assert!(carts.get(&session).unwrap().is_none());
    }
}
