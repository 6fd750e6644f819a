//! The route contract and the cart pipeline shared by cart routes.

use crate::args::{ArgSchema, Args};
use crate::controller::CartController;
use crate::error::RouteError;
use crate::schema::{CartSchema, Schema};
use http::{Method, StatusCode};
use serde_json::Value;
use store_commerce::cart::Cart;
use store_session::SessionId;

/// What a handler sees of the request.
///
/// Arguments are already validated against [`Route::args`].
pub struct RouteContext<'a> {
    pub args: &'a Args,
    pub session: &'a SessionId,
    pub controller: &'a CartController,
}

/// A response body.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteBody {
    Json(Value),
    /// JSON text the handler wrote itself. Response filters do not see it.
    Text(String),
}

impl RouteBody {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RouteBody::Json(value) => value.to_string().into_bytes(),
            RouteBody::Text(text) => text.into_bytes(),
        }
    }
}

/// A successful handler result.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutput {
    pub status: StatusCode,
    pub body: RouteBody,
}

impl RouteOutput {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: RouteBody::Json(body),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// A body that is already serialized JSON.
    pub fn json_text(status: StatusCode, text: String) -> Self {
        Self {
            status,
            body: RouteBody::Text(text),
        }
    }
}

/// One REST endpoint.
///
/// A route is immutable once registered. The router matches its path and
/// method, validates [`Route::args`], checks [`Route::capability`] and only
/// then calls [`Route::handle`].
pub trait Route: Send + Sync {
    /// Path pattern, e.g. `/cart/items/:key`.
    fn path(&self) -> &'static str;

    fn method(&self) -> Method;

    fn args(&self) -> ArgSchema {
        ArgSchema::new()
    }

    /// Capability the caller must hold, if any.
    fn capability(&self) -> Option<&'static str> {
        None
    }

    /// JSON-Schema of the response item.
    fn item_schema(&self) -> Value;

    fn handle(&self, ctx: &RouteContext<'_>) -> Result<RouteOutput, RouteError>;
}

/// Load the cart, apply `mutate`, recalculate shipping then totals, commit
/// and serialize.
///
/// Any error stops the pipeline before the commit, so the stored cart only
/// ever changes as a whole. A commit racing another request on the same
/// session fails with `cart_conflict` instead of overwriting it.
pub fn update_cart<F>(
    ctx: &RouteContext<'_>,
    status: StatusCode,
    mutate: F,
) -> Result<RouteOutput, RouteError>
where
    F: FnOnce(&CartController, &mut Cart) -> Result<(), RouteError>,
{
    let controller = ctx.controller;
    let mut record = controller.load_cart(ctx.session)?;
    mutate(controller, &mut record.cart)?;
    controller.recalculate(&mut record.cart)?;
    controller.save_cart(ctx.session, &record)?;
    Ok(RouteOutput::new(status, CartSchema.item_response(&record.cart)))
}

/// Load and recalculate the cart without committing it, then render it.
pub fn read_cart<F>(ctx: &RouteContext<'_>, render: F) -> Result<RouteOutput, RouteError>
where
    F: FnOnce(&Cart) -> Result<Value, RouteError>,
{
    let controller = ctx.controller;
    let mut cart = controller.get_cart_instance(ctx.session)?;
    controller.recalculate(&mut cart)?;
    Ok(RouteOutput::ok(render(&cart)?))
}
