//! Static registry of permission keys.
//!
//! Every controllable capability in the application is one variant here.
//! Call sites reference variants, never raw strings, so a misspelled key is
//! a compile error. The wire spelling must match what the authorization
//! source emits; drift between the two is a deployment concern.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission key: {0}")]
pub struct UnknownPermissionKey(pub String);

/// One controllable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKey {
    MaterialsRead,
    MaterialsWrite,
    MaterialsDelete,
    DailyReportsRead,
    DailyReportsCreate,
    DeliveriesRead,
    DeliveriesCreate,
    InventoryCountsOpen,
    InventoryCountsEnter,
    InventoryCountsClose,
    PvrRead,
    MetricsRead,
    TeamRead,
    TeamWrite,
    MembersForcePasswordReset,
}

impl PermissionKey {
    /// Every key, for iteration and test coverage.
    pub const ALL: &'static [PermissionKey] = &[
        PermissionKey::MaterialsRead,
        PermissionKey::MaterialsWrite,
        PermissionKey::MaterialsDelete,
        PermissionKey::DailyReportsRead,
        PermissionKey::DailyReportsCreate,
        PermissionKey::DeliveriesRead,
        PermissionKey::DeliveriesCreate,
        PermissionKey::InventoryCountsOpen,
        PermissionKey::InventoryCountsEnter,
        PermissionKey::InventoryCountsClose,
        PermissionKey::PvrRead,
        PermissionKey::MetricsRead,
        PermissionKey::TeamRead,
        PermissionKey::TeamWrite,
        PermissionKey::MembersForcePasswordReset,
    ];

    /// Wire spelling shared with the authorization source.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKey::MaterialsRead => "materials:read",
            PermissionKey::MaterialsWrite => "materials:write",
            PermissionKey::MaterialsDelete => "materials:delete",
            PermissionKey::DailyReportsRead => "daily_reports:read",
            PermissionKey::DailyReportsCreate => "daily_reports:create",
            PermissionKey::DeliveriesRead => "deliveries:read",
            PermissionKey::DeliveriesCreate => "deliveries:create",
            PermissionKey::InventoryCountsOpen => "inventory_counts:open",
            PermissionKey::InventoryCountsEnter => "inventory_counts:enter",
            PermissionKey::InventoryCountsClose => "inventory_counts:close",
            PermissionKey::PvrRead => "pvr:read",
            PermissionKey::MetricsRead => "metrics:read",
            PermissionKey::TeamRead => "team:read",
            PermissionKey::TeamWrite => "team:write",
            PermissionKey::MembersForcePasswordReset => "members:force_password_reset",
        }
    }
}

impl FromStr for PermissionKey {
    type Err = UnknownPermissionKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionKey::ALL
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownPermissionKey(s.to_string()))
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PermissionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PermissionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
