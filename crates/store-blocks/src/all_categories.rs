//! All-categories list block.

use crate::error::BlockError;
use store_api::schema::prepare_html_response as html_escape;
use store_commerce::catalog::{select_categories, CatalogStore, CategoryNode, CategoryQuery};
use store_commerce::ids::TermId;

/// Display options of the all-categories block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllCategoriesOptions {
    /// Show the product count next to each term.
    pub has_count: bool,
    /// Include terms with no products.
    pub has_empty: bool,
    pub is_dropdown: bool,
    /// Nest children under their parents.
    pub is_hierarchical: bool,
    pub align: Option<String>,
    pub class_name: Option<String>,
    /// Terms never shown, e.g. the catch-all "Uncategorized" term.
    pub exclude: Vec<TermId>,
}

impl Default for AllCategoriesOptions {
    fn default() -> Self {
        Self {
            has_count: true,
            has_empty: false,
            is_dropdown: false,
            is_hierarchical: true,
            align: None,
            class_name: None,
            exclude: Vec::new(),
        }
    }
}

impl AllCategoriesOptions {
    /// Apply `data-*` overrides saved in markup from before the block was
    /// server rendered.
    pub fn with_legacy_markup(mut self, content: &str) -> Self {
        if content.contains(r#"data-has-count="false""#) {
            self.has_count = false;
        }
        if content.contains(r#"data-is-dropdown="true""#) {
            self.is_dropdown = true;
        }
        if content.contains(r#"data-is-hierarchical="false""#) {
            self.is_hierarchical = false;
        }
        if content.contains(r#"data-has-empty="true""#) {
            self.has_empty = true;
        }
        self
    }

    fn container_classes(&self) -> String {
        let mut classes = vec!["wc-block-product-categories".to_string()];
        if let Some(align) = &self.align {
            classes.push(format!("align{}", align));
        }
        if let Some(class_name) = self.class_name.as_ref().filter(|c| !c.is_empty()) {
            classes.push(class_name.clone());
        }
        classes.push(if self.is_dropdown { "is-dropdown" } else { "is-list" }.to_string());
        classes.join(" ")
    }
}

/// Render the block. Returns an empty string when there is nothing to list.
pub fn render_all_categories(
    catalog: &dyn CatalogStore,
    options: &AllCategoriesOptions,
) -> Result<String, BlockError> {
    let query = CategoryQuery {
        hierarchical: options.is_hierarchical,
        hide_empty: !options.has_empty,
        exclude: options.exclude.clone(),
    };
    let forest = select_categories(catalog.categories()?, &query);
    if forest.is_empty() {
        return Ok(String::new());
    }

    Ok(format!(
        r#"<div class="{}">{}</div>"#,
        html_escape(&options.container_classes()),
        render_list(&forest, options)
    ))
}

/// Nested `<ul>` markup, written in one pass over an explicit stack.
fn render_list(forest: &[CategoryNode], options: &AllCategoriesOptions) -> String {
    enum Step<'a> {
        Open(&'a CategoryNode, usize),
        Close(&'a CategoryNode),
    }

    let mut out = list_open(0);
    let mut stack: Vec<Step<'_>> = forest.iter().rev().map(|n| Step::Open(n, 0)).collect();
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(node, depth) => {
                out.push_str(&list_item_open(node, options));
                stack.push(Step::Close(node));
                if !node.children.is_empty() {
                    out.push_str(&list_open(depth + 1));
                    stack.extend(node.children.iter().rev().map(|c| Step::Open(c, depth + 1)));
                }
            }
            Step::Close(node) => {
                if !node.children.is_empty() {
                    out.push_str("</ul>");
                }
                out.push_str("</li>");
            }
        }
    }
    out.push_str("</ul>");
    out
}

fn list_open(depth: usize) -> String {
    format!(
        r#"<ul class="wc-block-all-categories-list wc-block-all-categories-list--depth-{}">"#,
        depth
    )
}

fn list_item_open(node: &CategoryNode, options: &AllCategoriesOptions) -> String {
    let term = &node.term;
    format!(
        r#"<li class="wc-block-all-categories-list-item"><a href="/product-category/{}/">{}</a>{}"#,
        html_escape(&term.slug),
        html_escape(&term.name),
        count_html(term.count, options)
    )
}

fn count_html(count: u64, options: &AllCategoriesOptions) -> String {
    if !options.has_count {
        return String::new();
    }
    if options.is_dropdown {
        return format!("({})", count);
    }
    let noun = if count == 1 { "product" } else { "products" };
    format!(
        r#"<span class="wc-block-product-categories-list-item-count"><span aria-hidden="true">{count}</span><span class="screen-reader-text">{count} {noun}</span></span>"#
    )
}
