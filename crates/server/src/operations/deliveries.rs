//! Delivery intake operations.

use serde_json::json;
use siteward_auth::PermissionKey;
use siteward_domain::{Delivery, DeliveryDraft};
use siteward_infra::{BackendRpc, GateAudit};

use crate::context::RequestContext;
use crate::error::ServerError;
use crate::gate;

pub async fn list(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
) -> Result<Vec<Delivery>, ServerError> {
    let snapshot = gate::require(ctx, audit, "deliveries.list", PermissionKey::DeliveriesRead)?;
    let rows = rpc
        .call(
            ctx.token(),
            "delivery_list",
            json!({ "account_id": snapshot.account_id().as_str() }),
        )
        .await?;
    Ok(serde_json::from_value(rows)?)
}

/// Record an incoming delivery. Stock and WAC updates happen inside the
/// backend function; a denial here means nothing was written.
pub async fn record(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    draft: DeliveryDraft,
) -> Result<Delivery, ServerError> {
    let snapshot = gate::require(ctx, audit, "deliveries.record", PermissionKey::DeliveriesCreate)?;
    draft.validate()?;
    let row = rpc
        .call(
            ctx.token(),
            "delivery_record",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "draft": draft,
            }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}
