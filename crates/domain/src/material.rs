//! Material catalog records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One catalog entry with its current stock position. `wac_unit_cost` and
/// `stock_qty` are computed by the backend; this side never recalculates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub wac_unit_cost: f64,
    pub stock_qty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create-or-update payload. `id` absent means create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MaterialDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("material name"));
        }
        if self.unit.trim().is_empty() {
            return Err(ValidationError::Empty("material unit"));
        }
        Ok(())
    }
}
