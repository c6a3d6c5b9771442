//! Team and crew management operations.

use serde_json::json;
use siteward_auth::PermissionKey;
use siteward_domain::{TeamMember, TeamMemberDraft};
use siteward_infra::{BackendRpc, GateAudit};

use crate::context::RequestContext;
use crate::error::ServerError;
use crate::gate;

pub async fn roster(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
) -> Result<Vec<TeamMember>, ServerError> {
    let snapshot = gate::require(ctx, audit, "team.roster", PermissionKey::TeamRead)?;
    let rows = rpc
        .call(
            ctx.token(),
            "team_roster",
            json!({ "account_id": snapshot.account_id().as_str() }),
        )
        .await?;
    Ok(serde_json::from_value(rows)?)
}

pub async fn upsert_member(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    draft: TeamMemberDraft,
) -> Result<TeamMember, ServerError> {
    let snapshot = gate::require(ctx, audit, "team.upsert_member", PermissionKey::TeamWrite)?;
    draft.validate()?;
    let row = rpc
        .call(
            ctx.token(),
            "team_member_upsert",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "draft": draft,
            }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}

/// Invalidate a member's password. Gated by its own key rather than
/// `team:write`; the actual reset happens in the auth service behind the
/// backend function.
pub async fn force_password_reset(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    member_id: &str,
) -> Result<(), ServerError> {
    let snapshot = gate::require(
        ctx,
        audit,
        "team.force_password_reset",
        PermissionKey::MembersForcePasswordReset,
    )?;
    rpc.call(
        ctx.token(),
        "member_force_password_reset",
        json!({
            "account_id": snapshot.account_id().as_str(),
            "member_id": member_id,
        }),
    )
    .await?;
    Ok(())
}
