//! Thin HTTP client for the backend's SQL functions.
//!
//! Every call is `POST {base}/rpc/{function}` with a JSON parameter object.
//! The service api key authenticates this deployment; the caller's session
//! token, when present, is forwarded verbatim so the backend resolves the
//! request identity itself. No identity logic lives on this side.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seam to the backend. One method; functions are addressed by name.
#[async_trait]
pub trait BackendRpc: Send + Sync {
    async fn call(
        &self,
        token: Option<&str>,
        function: &str,
        params: Value,
    ) -> Result<Value, RpcError>;
}

pub struct HttpBackendRpc {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl HttpBackendRpc {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn endpoint(&self, function: &str) -> String {
        format!("{}/rpc/{}", self.base_url, function)
    }
}

#[async_trait]
impl BackendRpc for HttpBackendRpc {
    async fn call(
        &self,
        token: Option<&str>,
        function: &str,
        params: Value,
    ) -> Result<Value, RpcError> {
        let url = self.endpoint(function);
        debug!("rpc call: {function}");

        let mut request = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .json(&params);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("rpc {function} failed with status {status}");
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let rpc = HttpBackendRpc::new("https://backend.example/", "key");
        assert_eq!(
            rpc.endpoint("my_permissions_snapshot"),
            "https://backend.example/rpc/my_permissions_snapshot"
        );
    }

    #[test]
    fn test_endpoint_plain_base() {
        let rpc = HttpBackendRpc::new("http://localhost:4000", "key");
        assert_eq!(rpc.endpoint("materials_list"), "http://localhost:4000/rpc/materials_list");
    }
}
