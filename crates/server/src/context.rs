//! Per-request context.
//!
//! Built once at the HTTP boundary and passed explicitly down every call
//! chain; there is no ambient or thread-local authorization state. The
//! snapshot inside is read-only, so every gate evaluated during the request
//! observes the same value.

use siteward_auth::{PermissionSnapshot, Role};
use uuid::Uuid;

pub struct RequestContext {
    request_id: String,
    token: Option<String>,
    snapshot: Option<PermissionSnapshot>,
}

impl RequestContext {
    pub fn new(token: Option<String>, snapshot: Option<PermissionSnapshot>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            token,
            snapshot,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Opaque session token, forwarded verbatim to the backend.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn snapshot(&self) -> Option<&PermissionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn account_id(&self) -> Option<&str> {
        self.snapshot.as_ref().map(|s| s.account_id().as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot.as_ref().map(|s| s.role())
    }
}
