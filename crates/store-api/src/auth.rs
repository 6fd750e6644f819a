//! Capability checks for protected routes.

use http::HeaderMap;
use store_session::SessionId;

/// Decides whether a request holds a capability.
///
/// Policy lives outside the API; the router only asks.
pub trait Authorizer: Send + Sync {
    fn allows(&self, capability: &str, request: &AuthRequest<'_>) -> bool;
}

/// What an [`Authorizer`] gets to look at.
#[derive(Debug)]
pub struct AuthRequest<'a> {
    pub headers: &'a HeaderMap,
    pub session: &'a SessionId,
}

/// Grants every capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn allows(&self, _capability: &str, _request: &AuthRequest<'_>) -> bool {
        true
    }
}

/// Denies every capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authorizer for DenyAll {
    fn allows(&self, _capability: &str, _request: &AuthRequest<'_>) -> bool {
        false
    }
}
