//! HTTP gateway. Each route is the entry point of one gate site.
//!
//! Per request: rate-limit, read the session token and the signed account
//! cookie, fetch the snapshot exactly once, then hand an explicit
//! `RequestContext` to the operation. Handlers never consult the
//! authorization source again.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use siteward_auth::fetch_snapshot;
use siteward_domain::{
    CountLine, CountLineEntry, CountSession, DailyReport, DailyReportDraft, Delivery,
    DeliveryDraft, Material, MaterialDraft, PvrSummaryRow, ShrinkPoint, ShrinkRange, TeamMember,
    TeamMemberDraft, ValidationError,
};
use siteward_infra::{BackendRpc, GateAudit, RpcSnapshotSource, TenantCookieCodec, ACCOUNT_COOKIE};
use tracing::{info, warn};

use crate::context::RequestContext;
use crate::error::{GateError, ServerError};
use crate::operations;
use crate::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    rpc: Arc<dyn BackendRpc>,
    audit: Arc<dyn GateAudit>,
    cookies: Arc<TenantCookieCodec>,
    limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        rpc: Arc<dyn BackendRpc>,
        audit: Arc<dyn GateAudit>,
        cookies: Arc<TenantCookieCodec>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            rpc,
            audit,
            cookies,
            limiter,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/account/select", post(select_account))
        .route("/materials", get(list_materials).post(upsert_material))
        .route("/materials/:id", delete(soft_delete_material))
        .route(
            "/daily-reports",
            get(list_daily_reports).post(submit_daily_report),
        )
        .route("/deliveries", get(list_deliveries).post(record_delivery))
        .route("/counts", post(open_count))
        .route("/counts/:id/lines", post(enter_count_line))
        .route("/counts/:id/close", post(close_count))
        .route("/reports/plan-vs-actual", get(pvr_overview))
        .route("/reports/shrinkage", get(shrink_series))
        .route("/team", get(team_roster).post(upsert_team_member))
        .route("/team/:id/force-password-reset", post(force_password_reset))
        .with_state(state)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn selected_account(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let raw = cookie_value(headers, ACCOUNT_COOKIE)?;
    match state.cookies.decode(&raw, Utc::now()) {
        Ok(account_id) => Some(account_id),
        Err(err) => {
            // Treated as "no tenant selected", which denies downstream.
            warn!("account cookie rejected: {err}");
            None
        }
    }
}

/// One snapshot fetch per request; everything downstream shares the result.
async fn request_context(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<RequestContext, ServerError> {
    let token = bearer_token(headers);
    let limiter_key = token.clone().unwrap_or_else(|| "anonymous".to_string());
    if !state.limiter.check(&limiter_key) {
        return Err(ServerError::RateLimited);
    }

    let account_id = selected_account(state, headers);
    let source = RpcSnapshotSource::new(state.rpc.clone(), token.clone(), account_id);
    let snapshot = fetch_snapshot(&source).await;
    Ok(RequestContext::new(token, snapshot))
}

#[derive(Debug, Deserialize)]
struct SelectAccountBody {
    account_id: String,
}

/// The sole writer of authorization-relevant state: persists the tenant
/// selection into the signed cookie. Membership is not checked here; a
/// selection the identity has no rights in simply yields an empty snapshot
/// on the next request.
async fn select_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SelectAccountBody>,
) -> Result<impl IntoResponse, ServerError> {
    let token = bearer_token(&headers).ok_or(GateError::Unauthenticated)?;
    if !state.limiter.check(&token) {
        return Err(ServerError::RateLimited);
    }
    if body.account_id.trim().is_empty() {
        return Err(ServerError::Validation(ValidationError::Empty("account id")));
    }

    let cookie = state.cookies.set_cookie_header(&body.account_id, Utc::now());
    info!("account selection updated");
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

#[derive(Debug, Deserialize)]
struct MaterialsQuery {
    #[serde(default)]
    include_deleted: bool,
}

async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<MaterialsQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Material>>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let materials = operations::materials::list(
        &ctx,
        state.rpc.as_ref(),
        state.audit.as_ref(),
        query.include_deleted,
    )
    .await?;
    Ok(Json(materials))
}

async fn upsert_material(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<MaterialDraft>,
) -> Result<Json<Material>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let material =
        operations::materials::upsert(&ctx, state.rpc.as_ref(), state.audit.as_ref(), draft)
            .await?;
    Ok(Json(material))
}

async fn soft_delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    operations::materials::soft_delete(&ctx, state.rpc.as_ref(), state.audit.as_ref(), &material_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ReportRangeQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

async fn list_daily_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportRangeQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<DailyReport>>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let reports = operations::daily_reports::list(
        &ctx,
        state.rpc.as_ref(),
        state.audit.as_ref(),
        query.from,
        query.to,
    )
    .await?;
    Ok(Json(reports))
}

async fn submit_daily_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<DailyReportDraft>,
) -> Result<Json<DailyReport>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let report =
        operations::daily_reports::submit(&ctx, state.rpc.as_ref(), state.audit.as_ref(), draft)
            .await?;
    Ok(Json(report))
}

async fn list_deliveries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Delivery>>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let deliveries =
        operations::deliveries::list(&ctx, state.rpc.as_ref(), state.audit.as_ref()).await?;
    Ok(Json(deliveries))
}

async fn record_delivery(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<DeliveryDraft>,
) -> Result<Json<Delivery>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let delivery =
        operations::deliveries::record(&ctx, state.rpc.as_ref(), state.audit.as_ref(), draft)
            .await?;
    Ok(Json(delivery))
}

async fn open_count(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CountSession>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let session = operations::counts::open(&ctx, state.rpc.as_ref(), state.audit.as_ref()).await?;
    Ok(Json(session))
}

async fn enter_count_line(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(entry): Json<CountLineEntry>,
) -> Result<Json<CountLine>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let line = operations::counts::enter_line(
        &ctx,
        state.rpc.as_ref(),
        state.audit.as_ref(),
        &session_id,
        entry,
    )
    .await?;
    Ok(Json(line))
}

async fn close_count(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CountSession>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let session =
        operations::counts::close(&ctx, state.rpc.as_ref(), state.audit.as_ref(), &session_id)
            .await?;
    Ok(Json(session))
}

async fn pvr_overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PvrSummaryRow>>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let rows =
        operations::metrics::pvr_overview(&ctx, state.rpc.as_ref(), state.audit.as_ref()).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
struct ShrinkQuery {
    from: NaiveDate,
    to: NaiveDate,
}

async fn shrink_series(
    State(state): State<AppState>,
    Query(query): Query<ShrinkQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<ShrinkPoint>>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let range = ShrinkRange {
        from: query.from,
        to: query.to,
    };
    let points =
        operations::metrics::shrink_series(&ctx, state.rpc.as_ref(), state.audit.as_ref(), range)
            .await?;
    Ok(Json(points))
}

async fn team_roster(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TeamMember>>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let members = operations::team::roster(&ctx, state.rpc.as_ref(), state.audit.as_ref()).await?;
    Ok(Json(members))
}

async fn upsert_team_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<TeamMemberDraft>,
) -> Result<Json<TeamMember>, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    let member =
        operations::team::upsert_member(&ctx, state.rpc.as_ref(), state.audit.as_ref(), draft)
            .await?;
    Ok(Json(member))
}

async fn force_password_reset(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ServerError> {
    let ctx = request_context(&state, &headers).await?;
    operations::team::force_password_reset(
        &ctx,
        state.rpc.as_ref(),
        state.audit.as_ref(),
        &member_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
