//! Inventory count sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountSession {
    pub id: String,
    pub account_id: String,
    pub status: CountStatus,
    pub opened_at: DateTime<Utc>,
    pub opened_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

/// One counted position. `expected_qty` is filled in by the backend when the
/// session closes; the shrinkage delta is derived there, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountLine {
    pub material_id: String,
    pub counted_qty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_qty: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountLineEntry {
    pub material_id: String,
    pub counted_qty: f64,
}

impl CountLineEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.material_id.is_empty() {
            return Err(ValidationError::Empty("count line material id"));
        }
        if self.counted_qty < 0.0 {
            return Err(ValidationError::Negative("counted quantity"));
        }
        Ok(())
    }
}
