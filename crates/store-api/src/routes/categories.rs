//! Product category routes.

use crate::args::{ArgSchema, ArgSpec};
use crate::error::RouteError;
use crate::route::{Route, RouteContext, RouteOutput};
use crate::schema::{CategoryTreeSchema, Schema, TermSchema};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use store_commerce::catalog::{forest_depth, select_categories, CategoryQuery};
use store_commerce::ids::TermId;
use store_commerce::CommerceError;
use tracing::debug;

/// Trees deeper than this are written as JSON text instead of a nested
/// `Value`, which serializes and drops one call frame per level.
const MAX_VALUE_DEPTH: usize = 64;

/// `GET /products/categories`
///
/// Flat by default; `hierarchical=true` nests children under their parents.
pub struct ListCategories;

impl Route for ListCategories {
    fn path(&self) -> &'static str {
        "/products/categories"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
            .arg(
                ArgSpec::boolean("hierarchical")
                    .default(json!(false))
                    .describe("Nest child terms under their parent."),
            )
            .arg(
                ArgSpec::boolean("hide_empty")
                    .default(json!(false))
                    .describe("Whether to hide terms not assigned to any products."),
            )
            .arg(ArgSpec::array("exclude").describe("Ensure result set excludes specific term IDs."))
    }

    fn item_schema(&self) -> Value {
        CategoryTreeSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let exclude = ctx
            .args
            .array("exclude")
            .iter()
            .map(term_id)
            .collect::<Result<Vec<_>, _>>()?;
        let query = CategoryQuery {
            hierarchical: ctx.args.bool("hierarchical").unwrap_or(false),
            hide_empty: ctx.args.bool("hide_empty").unwrap_or(false),
            exclude,
        };

        let terms = ctx.controller.catalog().categories()?;
        let forest = select_categories(terms, &query);
        debug!(roots = forest.len(), hierarchical = query.hierarchical, "categories selected");

        let body = if query.hierarchical {
            let depth = forest_depth(&forest);
            if depth > MAX_VALUE_DEPTH {
                debug!(depth, "category tree rendered as text");
                let text = CategoryTreeSchema.to_json_string(&forest);
                return Ok(RouteOutput::json_text(StatusCode::OK, text));
            }
            CategoryTreeSchema.item_response(&forest)
        } else {
            Value::Array(forest.iter().map(|node| TermSchema.item_response(&node.term)).collect())
        };
        Ok(RouteOutput::ok(body))
    }
}

/// `GET /products/categories/:id`
pub struct GetCategory;

impl Route for GetCategory {
    fn path(&self) -> &'static str {
        "/products/categories/:id"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn args(&self) -> ArgSchema {
        ArgSchema::new().arg(
            ArgSpec::integer("id")
                .required()
                .minimum(1)
                .describe("Unique identifier for the resource."),
        )
    }

    fn item_schema(&self) -> Value {
        TermSchema.public_item_schema()
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError> {
        let id = ctx.args.require_i64("id")?;
        let id = u64::try_from(id).map_err(|_| RouteError::invalid_param("id", "id must be positive"))?;
        let term = ctx
            .controller
            .catalog()
            .get_category(TermId(id))?
            .ok_or(CommerceError::TermNotFound(id))?;
        Ok(RouteOutput::ok(TermSchema.item_response(&term)))
    }
}

/// An `exclude` entry: an integer or a numeric string.
fn term_id(value: &Value) -> Result<TermId, RouteError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .map(TermId)
        .ok_or_else(|| RouteError::invalid_param("exclude", "exclude must list term IDs"))
}
