//! Resolved authorization state for one identity within one tenant.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::keys::PermissionKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role label: {0}")]
pub struct UnknownRole(pub String);

/// Errors crossing the parse boundary from the raw authorization row.
///
/// Every variant means "deny" to callers; none of them can grant access.
#[derive(Debug, Error)]
pub enum SnapshotDecodeError {
    #[error("snapshot row has no account id")]
    MissingAccountId,

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("snapshot row is not the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Active tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse role label. Role-to-permission resolution happens inside the
/// authorization source; this label is carried for display and audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Manager,
    Foreman,
    Storeman,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Foreman => "foreman",
            Role::Storeman => "storeman",
            Role::Worker => "worker",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "foreman" => Ok(Role::Foreman),
            "storeman" => Ok(Role::Storeman),
            "worker" => Ok(Role::Worker),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permission entry as the authorization source emits it: either a
/// `{permission_key, allowed}` pair or a bare key string in an allowed-set.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPermission {
    Flag { permission_key: String, allowed: bool },
    Key(String),
}

/// Snapshot row as returned by the authorization source, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshotRow {
    #[serde(default)]
    pub account_id: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<RawPermission>,
}

/// Immutable authorization state for one identity+tenant+request.
///
/// Constructed once per request from the authorization source and shared
/// read-only for the lifetime of that request. There is no mutating API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSnapshot {
    account_id: AccountId,
    role: Role,
    permissions: HashSet<PermissionKey>,
}

impl PermissionSnapshot {
    pub fn new(
        account_id: AccountId,
        role: Role,
        permissions: impl IntoIterator<Item = PermissionKey>,
    ) -> Self {
        Self {
            account_id,
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Validate a raw row into a well-typed snapshot.
    ///
    /// Structural problems (missing account id, unknown role) fail the whole
    /// row. Unknown permission spellings are dropped with a warning: they
    /// cannot grant anything because gates reference typed keys, and failing
    /// the row for them would let registry drift lock out a whole tenant.
    pub fn from_raw(raw: RawSnapshotRow) -> Result<Self, SnapshotDecodeError> {
        if raw.account_id.is_empty() {
            return Err(SnapshotDecodeError::MissingAccountId);
        }
        let role: Role = raw.role.parse()?;

        let mut permissions = HashSet::new();
        for entry in raw.permissions {
            let spelling = match entry {
                RawPermission::Flag { allowed: false, .. } => continue,
                RawPermission::Flag {
                    permission_key, ..
                } => permission_key,
                RawPermission::Key(key) => key,
            };
            match spelling.parse::<PermissionKey>() {
                Ok(key) => {
                    permissions.insert(key);
                }
                Err(unknown) => {
                    warn!(account_id = %raw.account_id, "{unknown}, dropping");
                }
            }
        }

        Ok(Self {
            account_id: AccountId::new(raw.account_id),
            role,
            permissions,
        })
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> &HashSet<PermissionKey> {
        &self.permissions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawSnapshotRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_raw_allowed_set_shape() {
        let row = raw(json!({
            "account_id": "acc-1",
            "role": "manager",
            "permissions": ["materials:read", "daily_reports:read"],
        }));
        let snapshot = PermissionSnapshot::from_raw(row).unwrap();
        assert_eq!(snapshot.account_id().as_str(), "acc-1");
        assert_eq!(snapshot.role(), Role::Manager);
        assert!(snapshot.permissions().contains(&PermissionKey::MaterialsRead));
        assert_eq!(snapshot.permissions().len(), 2);
    }

    #[test]
    fn test_from_raw_flag_pairs_shape() {
        let row = raw(json!({
            "account_id": "acc-1",
            "role": "storeman",
            "permissions": [
                {"permission_key": "deliveries:create", "allowed": true},
                {"permission_key": "materials:delete", "allowed": false},
            ],
        }));
        let snapshot = PermissionSnapshot::from_raw(row).unwrap();
        assert!(snapshot.permissions().contains(&PermissionKey::DeliveriesCreate));
        assert!(!snapshot.permissions().contains(&PermissionKey::MaterialsDelete));
    }

    #[test]
    fn test_from_raw_missing_account_denies() {
        let row = raw(json!({"role": "worker", "permissions": []}));
        assert!(matches!(
            PermissionSnapshot::from_raw(row),
            Err(SnapshotDecodeError::MissingAccountId)
        ));
    }

    #[test]
    fn test_from_raw_unknown_role_denies() {
        let row = raw(json!({
            "account_id": "acc-1",
            "role": "superadmin",
            "permissions": [],
        }));
        assert!(matches!(
            PermissionSnapshot::from_raw(row),
            Err(SnapshotDecodeError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_from_raw_unknown_permission_dropped() {
        let row = raw(json!({
            "account_id": "acc-1",
            "role": "owner",
            "permissions": ["materials:read", "warp_drive:engage"],
        }));
        let snapshot = PermissionSnapshot::from_raw(row).unwrap();
        assert_eq!(snapshot.permissions().len(), 1);
        assert!(snapshot.permissions().contains(&PermissionKey::MaterialsRead));
    }

    #[test]
    fn test_role_labels_round_trip() {
        for role in [
            Role::Owner,
            Role::Manager,
            Role::Foreman,
            Role::Storeman,
            Role::Worker,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
