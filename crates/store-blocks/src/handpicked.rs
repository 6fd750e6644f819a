//! Handpicked products block.

use crate::error::BlockError;
use store_api::schema::prepare_html_response as html_escape;
use store_commerce::catalog::{CatalogStore, Product};
use store_commerce::ids::ProductId;

/// Options of the handpicked products block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandpickedOptions {
    /// Products to show, in display order.
    pub products: Vec<ProductId>,
    pub columns: u32,
    /// Leave out products that cannot be bought right now.
    pub hide_out_of_stock: bool,
}

impl Default for HandpickedOptions {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            columns: 3,
            hide_out_of_stock: false,
        }
    }
}

/// Render the chosen products as a grid. Unknown ids are skipped; nothing
/// is rendered when no product is left.
pub fn render_handpicked(
    catalog: &dyn CatalogStore,
    options: &HandpickedOptions,
) -> Result<String, BlockError> {
    let mut products = Vec::with_capacity(options.products.len());
    for id in &options.products {
        match catalog.get_product(*id)? {
            Some(product) if options.hide_out_of_stock && !in_stock(&product) => {}
            Some(product) => products.push(product),
            None => tracing::debug!(product = %id, "handpicked product missing"),
        }
    }
    if products.is_empty() {
        return Ok(String::new());
    }

    let items: String = products.iter().map(render_product).collect();
    Ok(format!(
        r#"<div class="wc-block-handpicked-slider wc-block-grid has-{} columns"><ul class="wc-block-grid__products">{}</ul></div>"#,
        options.columns, items
    ))
}

fn in_stock(product: &Product) -> bool {
    product.purchasable && product.has_enough_stock(1)
}

fn render_product(product: &Product) -> String {
    format!(
        r#"<li class="wc-block-grid__product"><a href="/product/{}/" class="wc-block-grid__product-link"><div class="wc-block-grid__product-title">{}</div></a><div class="wc-block-grid__product-price price">{}</div></li>"#,
        html_escape(&product.slug),
        html_escape(&product.name),
        html_escape(&product.price.to_string())
    )
}
