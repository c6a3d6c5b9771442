//! Reporting projections. Read-only; both series come back fully aggregated
//! from backend views.

use serde_json::json;
use siteward_auth::PermissionKey;
use siteward_domain::{PvrSummaryRow, ShrinkPoint, ShrinkRange};
use siteward_infra::{BackendRpc, GateAudit};

use crate::context::RequestContext;
use crate::error::ServerError;
use crate::gate;

pub async fn pvr_overview(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
) -> Result<Vec<PvrSummaryRow>, ServerError> {
    let snapshot = gate::require_any(
        ctx,
        audit,
        "metrics.pvr_overview",
        &[PermissionKey::PvrRead, PermissionKey::MetricsRead],
    )?;
    let rows = rpc
        .call(
            ctx.token(),
            "pvr_summary_overview",
            json!({ "account_id": snapshot.account_id().as_str() }),
        )
        .await?;
    Ok(serde_json::from_value(rows)?)
}

pub async fn shrink_series(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    range: ShrinkRange,
) -> Result<Vec<ShrinkPoint>, ServerError> {
    let snapshot = gate::require_any(
        ctx,
        audit,
        "metrics.shrink_series",
        &[PermissionKey::MetricsRead, PermissionKey::InventoryCountsOpen],
    )?;
    let rows = rpc
        .call(
            ctx.token(),
            "inventory_shrink_series",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "from": range.from,
                "to": range.to,
            }),
        )
        .await?;
    Ok(serde_json::from_value(rows)?)
}
