//! Material catalog operations.

use serde_json::json;
use siteward_auth::PermissionKey;
use siteward_domain::{Material, MaterialDraft};
use siteward_infra::{BackendRpc, GateAudit};

use crate::context::RequestContext;
use crate::error::ServerError;
use crate::gate;

pub async fn list(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    include_deleted: bool,
) -> Result<Vec<Material>, ServerError> {
    let snapshot = gate::require(ctx, audit, "materials.list", PermissionKey::MaterialsRead)?;
    let rows = rpc
        .call(
            ctx.token(),
            "materials_list",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "include_deleted": include_deleted,
            }),
        )
        .await?;
    Ok(serde_json::from_value(rows)?)
}

pub async fn upsert(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    draft: MaterialDraft,
) -> Result<Material, ServerError> {
    let snapshot = gate::require(ctx, audit, "materials.upsert", PermissionKey::MaterialsWrite)?;
    draft.validate()?;
    let row = rpc
        .call(
            ctx.token(),
            "material_upsert",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "draft": draft,
            }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}

pub async fn soft_delete(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    material_id: &str,
) -> Result<(), ServerError> {
    let snapshot = gate::require(ctx, audit, "materials.delete", PermissionKey::MaterialsDelete)?;
    rpc.call(
        ctx.token(),
        "material_soft_delete",
        json!({
            "account_id": snapshot.account_id().as_str(),
            "material_id": material_id,
        }),
    )
    .await?;
    Ok(())
}
