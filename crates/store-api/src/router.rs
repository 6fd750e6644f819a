//! Route registry and request dispatch.

use crate::args::{merge_sources, ArgSchema};
use crate::auth::{AllowAll, AuthRequest, Authorizer};
use crate::controller::CartController;
use crate::error::RouteError;
use crate::route::{Route, RouteBody, RouteContext, RouteOutput};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use store_session::SessionId;
use tracing::{debug, error, info, info_span, warn};

/// Header carrying the session the request is bound to.
pub const CART_TOKEN_HEADER: &str = "cart-token";

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Rewrites the serialized body of a successful response.
pub type ResponseFilter = Box<dyn Fn(&RouteMatch, Value) -> Value + Send + Sync>;

/// The route a request resolved to, as seen by response filters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub method: Method,
    /// The registered pattern, e.g. `/cart/items/:key`.
    pub pattern: &'static str,
    /// The concrete request path.
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub session: SessionId,
    pub request_id: String,
}

/// A `/`-separated path pattern with `:name` captures.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoutePattern {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl RoutePattern {
    fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Captured params if `path` matches.
    fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

struct Registered {
    pattern: RoutePattern,
    args: ArgSchema,
    capability: Option<&'static str>,
    route: Arc<dyn Route>,
}

/// Owns the registered routes and turns requests into responses.
///
/// Every response, success or error, is JSON and carries `Content-Type`,
/// `X-Request-Id` and `Cart-Token` headers.
pub struct Router {
    controller: Arc<CartController>,
    authorizer: Arc<dyn Authorizer>,
    routes: Vec<Registered>,
    filters: Vec<ResponseFilter>,
}

impl Router {
    pub fn new(controller: Arc<CartController>) -> Self {
        Self {
            controller,
            authorizer: Arc::new(AllowAll),
            routes: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn controller(&self) -> &Arc<CartController> {
        &self.controller
    }

    /// Register a route. The first registration of a path/method pair wins.
    pub fn register(&mut self, route: Arc<dyn Route>) -> &mut Self {
        let capability = route.capability();
        self.register_inner(route, capability)
    }

    /// Register a route behind an extra capability.
    pub fn register_with_capability(
        &mut self,
        route: Arc<dyn Route>,
        capability: &'static str,
    ) -> &mut Self {
        self.register_inner(route, Some(capability))
    }

    fn register_inner(
        &mut self,
        route: Arc<dyn Route>,
        capability: Option<&'static str>,
    ) -> &mut Self {
        self.routes.push(Registered {
            pattern: RoutePattern::parse(route.path()),
            args: route.args(),
            capability,
            route,
        });
        self
    }

    /// Add a filter over successful response bodies. Filters run in the
    /// order they were added.
    pub fn add_response_filter<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(&RouteMatch, Value) -> Value + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// `(method, pattern)` of every registered route.
    pub fn routes(&self) -> Vec<(Method, &'static str)> {
        self.routes
            .iter()
            .map(|r| (r.route.method(), r.route.path()))
            .collect()
    }

    /// Handle one request.
    ///
    /// Never fails: errors, including a panicking handler, become error
    /// envelopes.
    pub fn dispatch(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let request_id = header_str(request.headers(), REQUEST_ID_HEADER)
            .filter(|id| is_valid_request_id(id))
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let session = header_str(request.headers(), CART_TOKEN_HEADER)
            .and_then(SessionId::parse)
            .unwrap_or_else(SessionId::generate);

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );
        let _guard = span.enter();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.handle(&request, &session, &request_id)
        }));
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(RouteError::internal(anyhow::anyhow!(
                "handler panicked: {}",
                panic_message(payload.as_ref())
            ))),
        };

        let (status, body) = match result {
            Ok(output) => {
                info!(status = output.status.as_u16(), "request handled");
                (output.status, output.body.into_bytes())
            }
            Err(err) => {
                log_route_error(&err);
                (err.status(), err.to_envelope().to_string().into_bytes())
            }
        };
        build_response(status, body, &request_id, &session)
    }

    fn handle(
        &self,
        request: &Request<Vec<u8>>,
        session: &SessionId,
        request_id: &str,
    ) -> Result<RouteOutput, RouteError> {
        if !accepts_json(header_str(request.headers(), ACCEPT.as_str())) {
            return Err(RouteError::not_acceptable());
        }

        let path = request.uri().path();
        let method = request.method();
        let mut path_known = false;
        let mut found = None;
        for registered in &self.routes {
            if let Some(params) = registered.pattern.matches(path) {
                path_known = true;
                if registered.route.method() == *method {
                    found = Some((registered, params));
                    break;
                }
            }
        }

        let Some((registered, params)) = found else {
            if path_known && method == Method::OPTIONS {
                return Ok(self.describe(path));
            }
            return Err(RouteError::not_found());
        };

        let body = parse_body(request.body())?;
        let raw = merge_sources(&params, body, request.uri().query().unwrap_or_default());
        let args = registered.args.validate(raw)?;

        if let Some(capability) = registered.capability {
            let auth = AuthRequest {
                headers: request.headers(),
                session,
            };
            if !self.authorizer.allows(capability, &auth) {
                return Err(RouteError::forbidden());
            }
        }

        let ctx = RouteContext {
            args: &args,
            session,
            controller: &self.controller,
        };
        let output = registered.route.handle(&ctx)?;

        if self.filters.is_empty() {
            return Ok(output);
        }
        let body = match output.body {
            RouteBody::Json(body) => body,
            text @ RouteBody::Text(_) => {
                debug!("pre-serialized body bypasses response filters");
                return Ok(RouteOutput {
                    status: output.status,
                    body: text,
                });
            }
        };
        let route_match = RouteMatch {
            method: method.clone(),
            pattern: registered.route.path(),
            path: path.to_string(),
            params,
            session: session.clone(),
            request_id: request_id.to_string(),
        };
        let body = self
            .filters
            .iter()
            .fold(body, |body, filter| filter(&route_match, body));
        Ok(RouteOutput::new(output.status, body))
    }

    /// OPTIONS response: methods, arguments and item schema of a path.
    fn describe(&self, path: &str) -> RouteOutput {
        let matching: Vec<&Registered> = self
            .routes
            .iter()
            .filter(|r| r.pattern.matches(path).is_some())
            .collect();
        let methods: Vec<String> = matching.iter().map(|r| r.route.method().to_string()).collect();
        let endpoints: Vec<Value> = matching
            .iter()
            .map(|r| {
                json!({
                    "methods": [r.route.method().to_string()],
                    "args": r.args.describe_json(),
                })
            })
            .collect();
        let schema = matching
            .first()
            .map(|r| r.route.item_schema())
            .unwrap_or(Value::Null);
        RouteOutput::ok(json!({
            "methods": methods,
            "endpoints": endpoints,
            "schema": schema,
        }))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Whether an `Accept` header admits a JSON response. A missing or empty
/// header admits anything.
fn accepts_json(accept: Option<&str>) -> bool {
    let Some(accept) = accept.map(str::trim).filter(|a| !a.is_empty()) else {
        return true;
    };
    accept.split(',').any(|range| {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let refused = parts.any(|param| {
            let param = param.replace(' ', "");
            param
                .strip_prefix("q=")
                .and_then(|q| q.parse::<f32>().ok())
                .map_or(false, |q| q <= 0.0)
        });
        !refused && matches!(media.as_str(), "application/json" | "application/*" | "*/*")
    })
}

/// The JSON body as an argument map. An empty body yields no arguments.
fn parse_body(body: &[u8]) -> Result<Option<Map<String, Value>>, RouteError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(Value::Null) => Ok(None),
        Ok(_) => Err(RouteError::invalid_json("expected a JSON object")),
        Err(e) => Err(RouteError::invalid_json(e)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_route_error(err: &RouteError) {
    match err {
        RouteError::Internal(cause) => {
            error!(code = err.code(), error = %format!("{:#}", cause), "request failed");
        }
        _ => {
            warn!(
                code = err.code(),
                status = err.status().as_u16(),
                message = %err,
                "request rejected"
            );
        }
    }
}

fn build_response(
    status: StatusCode,
    body: Vec<u8>,
    request_id: &str,
    session: &SessionId,
) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(session.as_str()) {
        headers.insert(CART_TOKEN_HEADER, value);
    }
    response
}
