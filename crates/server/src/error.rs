//! Error taxonomy for the request path.
//!
//! Denials are first-class values, never unhandled errors: the HTTP mapping
//! turns them into 401/403 with opaque bodies. Failures of the privileged
//! operation itself surface as a generic backend error, distinct from any
//! denial.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use siteward_domain::ValidationError;
use siteward_infra::RpcError;
use thiserror::Error;
use tracing::{error, warn};

/// Terminal gate outcomes that stop an operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("request is not authenticated")]
    Unauthenticated,

    #[error("access denied")]
    Denied,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("invalid payload: {0}")]
    Validation(#[from] ValidationError),

    #[error("backend call failed: {0}")]
    Backend(#[from] RpcError),

    #[error("backend returned unexpected rows: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("too many requests")]
    RateLimited,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::Gate(GateError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, json!({"error": "unauthenticated"}))
            }
            ServerError::Gate(GateError::Denied) => {
                (StatusCode::FORBIDDEN, json!({"error": "access_denied"}))
            }
            ServerError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": "invalid_payload", "detail": err.to_string()}),
            ),
            ServerError::Backend(err) => {
                error!("backend failure: {err}");
                (StatusCode::BAD_GATEWAY, json!({"error": "backend_unavailable"}))
            }
            ServerError::Decode(err) => {
                error!("backend row decode failure: {err}");
                (StatusCode::BAD_GATEWAY, json!({"error": "backend_unavailable"}))
            }
            ServerError::RateLimited => {
                warn!("request rate limited");
                (StatusCode::TOO_MANY_REQUESTS, json!({"error": "rate_limited"}))
            }
        };
        (status, Json(body)).into_response()
    }
}
