//! Snapshot acquisition: one round-trip to the authorization source,
//! normalized and validated into `Option<PermissionSnapshot>`.
//!
//! The fetcher never fails open. Unauthenticated identities, missing tenant
//! selection, transport failures and malformed rows all collapse to `None`,
//! which every gate treats as "deny everything". Callers invoke this once
//! per request and share the result.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::snapshot::{PermissionSnapshot, RawSnapshotRow};

/// Failure modes of the external authorization source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no authenticated identity on the request")]
    Unauthenticated,

    #[error("no account selected for the request")]
    NoAccountSelected,

    #[error("authorization source unavailable: {0}")]
    Unavailable(String),
}

/// Seam to the external authorization source.
///
/// The ambient request identity (session token, selected tenant) is bound
/// into the implementation at construction; the call itself takes no
/// arguments, mirroring the parameterless server-side function it wraps.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// One query returning the raw snapshot row, either as a single record
    /// or as a one-element collection.
    async fn my_permissions_snapshot(&self) -> Result<Value, SourceError>;
}

/// Collapse the source's ambiguous return shape to at most one row.
///
/// A collection yields its first element, a scalar yields itself, and
/// null/empty yields nothing.
fn normalize_row(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(rows) => rows.into_iter().next(),
        row => Some(row),
    }
}

/// Validate one normalized row. Any decode failure is logged and denied.
pub fn decode_snapshot(value: Value) -> Option<PermissionSnapshot> {
    let row = normalize_row(value)?;
    let raw: RawSnapshotRow = match serde_json::from_value(row) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("snapshot row failed to decode, denying: {err}");
            return None;
        }
    };
    match PermissionSnapshot::from_raw(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("snapshot row failed validation, denying: {err}");
            None
        }
    }
}

/// Fetch the snapshot for the current request. Exactly one source
/// round-trip; never errors, never fails open.
pub async fn fetch_snapshot(source: &dyn SnapshotSource) -> Option<PermissionSnapshot> {
    let value = match source.my_permissions_snapshot().await {
        Ok(value) => value,
        Err(err @ (SourceError::Unauthenticated | SourceError::NoAccountSelected)) => {
            debug!("no snapshot: {err}");
            return None;
        }
        Err(err) => {
            warn!("authorization source failed, denying all: {err}");
            return None;
        }
    };
    decode_snapshot(value)
}
