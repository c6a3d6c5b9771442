//! Daily usage report operations.

use chrono::NaiveDate;
use serde_json::json;
use siteward_auth::PermissionKey;
use siteward_domain::{DailyReport, DailyReportDraft};
use siteward_infra::{BackendRpc, GateAudit};

use crate::context::RequestContext;
use crate::error::ServerError;
use crate::gate;

pub async fn list(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DailyReport>, ServerError> {
    let snapshot = gate::require(ctx, audit, "daily_reports.list", PermissionKey::DailyReportsRead)?;
    let rows = rpc
        .call(
            ctx.token(),
            "daily_report_list",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "from": from,
                "to": to,
            }),
        )
        .await?;
    Ok(serde_json::from_value(rows)?)
}

pub async fn submit(
    ctx: &RequestContext,
    rpc: &dyn BackendRpc,
    audit: &dyn GateAudit,
    draft: DailyReportDraft,
) -> Result<DailyReport, ServerError> {
    let snapshot = gate::require(
        ctx,
        audit,
        "daily_reports.submit",
        PermissionKey::DailyReportsCreate,
    )?;
    draft.validate()?;
    let row = rpc
        .call(
            ctx.token(),
            "daily_report_submit",
            json!({
                "account_id": snapshot.account_id().as_str(),
                "draft": draft,
            }),
        )
        .await?;
    Ok(serde_json::from_value(row)?)
}
