//! RPC-backed snapshot source.
//!
//! One instance is built per request, binding the request's session token
//! and selected account so the `SnapshotSource` call itself stays
//! parameterless. Short-circuits before the network when the request cannot
//! possibly resolve to a snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use siteward_auth::{SnapshotSource, SourceError};

use crate::rpc::BackendRpc;

pub struct RpcSnapshotSource {
    rpc: Arc<dyn BackendRpc>,
    token: Option<String>,
    account_id: Option<String>,
}

impl RpcSnapshotSource {
    pub fn new(rpc: Arc<dyn BackendRpc>, token: Option<String>, account_id: Option<String>) -> Self {
        Self {
            rpc,
            token,
            account_id,
        }
    }
}

#[async_trait]
impl SnapshotSource for RpcSnapshotSource {
    async fn my_permissions_snapshot(&self) -> Result<Value, SourceError> {
        let token = self.token.as_deref().ok_or(SourceError::Unauthenticated)?;
        let account_id = self
            .account_id
            .as_deref()
            .ok_or(SourceError::NoAccountSelected)?;

        self.rpc
            .call(
                Some(token),
                "my_permissions_snapshot",
                json!({ "account_id": account_id }),
            )
            .await
            .map_err(|err| SourceError::Unavailable(err.to_string()))
    }
}
