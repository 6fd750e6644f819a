//! HTTP transport: hands every request to the store router.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use std::sync::Arc;
use store_api::{RouteError, Router as StoreRouter};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest request body accepted.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the axum app around a store router.
///
/// The store router does its own matching, so axum only contributes a
/// fallback handler plus tracing and optional CORS layers.
pub fn build_app(router: Arc<StoreRouter>, enable_cors: bool) -> axum::Router {
    let app = axum::Router::new()
        .fallback(dispatch)
        .with_state(router)
        .layer(TraceLayer::new_for_http());
    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

async fn dispatch(State(router): State<Arc<StoreRouter>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "request body rejected");
            return error_response(&RouteError::invalid_json("request body could not be read"));
        }
    };
    let request = axum::http::Request::from_parts(parts, bytes.to_vec());

    // The pipeline is synchronous; keep it off the async workers.
    match tokio::task::spawn_blocking(move || router.dispatch(request)).await {
        Ok(response) => response.map(Body::from),
        Err(e) => {
            tracing::error!(error = %e, "dispatcher task failed");
            error_response(&RouteError::internal(e))
        }
    }
}

fn error_response(err: &RouteError) -> Response {
    let mut response = Response::new(Body::from(err.to_envelope().to_string()));
    *response.status_mut() = err.status();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}
