//! Inventory count session operations.

use serde_json::json;
use siteward_auth::PermissionKey;
use siteward_domain::{CountLine, CountLineEntry, CountSession};
use siteward_infra::{BackendRpc, GateAudit};

use crate::context::RequestContext;
use crate::error::ServerError;
use crate::gate;

pub async fn open(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
) -> Result<CountSession, ServerError> {
    let snapshot = gate::require(ctx, audit, "counts.open", PermissionKey::InventoryCountsOpen)?;
    let row = rpc
        .call(
            ctx.token(),
            "inventory_count_open",
            json!({ "account_id": snapshot.account_id().as_str() }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}

pub async fn enter_line(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    session_id: &str,
    entry: CountLineEntry,
) -> Result<CountLine, ServerError> {
    let snapshot = gate::require(ctx, audit, "counts.enter_line", PermissionKey::InventoryCountsEnter)?;
    entry.validate()?;
    let row = rpc
        .call(
            ctx.token(),
            "inventory_count_enter_line",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "session_id": session_id,
                "entry": entry,
            }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}

/// Close the session. The backend computes expected quantities and
/// shrinkage deltas at close time; the returned row carries the final state.
pub async fn close(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    session_id: &str,
) -> Result<CountSession, ServerError> {
    let snapshot = gate::require(ctx, audit, "counts.close", PermissionKey::InventoryCountsClose)?;
    let row = rpc
        .call(
            ctx.token(),
            "inventory_count_close",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "session_id": session_id,
            }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}
