//! Gate evaluation.
//!
//! Every privileged operation calls one of these before touching the
//! backend. Exactly two terminal outcomes per evaluation, both audited;
//! nothing is cached across operations, so each call re-evaluates the same
//! immutable snapshot.

use chrono::Utc;
use siteward_auth::{can, can_all, can_any, PermissionKey, PermissionSnapshot};
use siteward_infra::{GateAudit, GateOutcome, GateRecord};
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::GateError;

/// Require a single permission key. Returns the snapshot on allow so the
/// operation can read the active account without re-checking.
pub fn require<'a>(
    ctx: &'a RequestContext,
    audit: &dyn GateAudit,
    operation: &str,
    key: PermissionKey,
) -> Result<&'a PermissionSnapshot, GateError> {
    decide(ctx, audit, operation, &[key], can(ctx.snapshot(), key))
}

/// Require at least one of `keys`.
pub fn require_any<'a>(
    ctx: &'a RequestContext,
    audit: &dyn GateAudit,
    operation: &str,
    keys: &[PermissionKey],
) -> Result<&'a PermissionSnapshot, GateError> {
    decide(ctx, audit, operation, keys, can_any(ctx.snapshot(), keys))
}

/// Require every one of `keys`.
pub fn require_all<'a>(
    ctx: &'a RequestContext,
    audit: &dyn GateAudit,
    operation: &str,
    keys: &[PermissionKey],
) -> Result<&'a PermissionSnapshot, GateError> {
    decide(ctx, audit, operation, keys, can_all(ctx.snapshot(), keys))
}

fn decide<'a>(
    ctx: &'a RequestContext,
    audit: &dyn GateAudit,
    operation: &str,
    required: &[PermissionKey],
    allowed: bool,
) -> Result<&'a PermissionSnapshot, GateError> {
    let outcome = if allowed {
        GateOutcome::Allow
    } else {
        GateOutcome::Deny
    };
    emit(ctx, audit, operation, required, outcome);

    if allowed {
        debug!(operation, "gate allowed");
        // A gate can only allow through a non-null snapshot.
        return ctx.snapshot().ok_or(GateError::Unauthenticated);
    }

    match ctx.snapshot() {
        None => {
            warn!(operation, "gate denied: no snapshot");
            Err(GateError::Unauthenticated)
        }
        Some(_) => {
            warn!(operation, "gate denied: missing permission");
            Err(GateError::Denied)
        }
    }
}

// Audit failure never changes the gate outcome.
fn emit(
    ctx: &RequestContext,
    audit: &dyn GateAudit,
    operation: &str,
    required: &[PermissionKey],
    outcome: GateOutcome,
) {
    let record = GateRecord {
        timestamp: Utc::now().to_rfc3339(),
        request_id: ctx.request_id().to_string(),
        account_id: ctx.account_id().map(str::to_string),
        role: ctx.role().map(|r| r.as_str().to_string()),
        operation: operation.to_string(),
        required: required.iter().map(|k| k.to_string()).collect(),
        outcome,
    };
    if let Err(err) = audit.record(&record) {
        warn!(operation, "gate audit failed: {err}");
    }
}
