//! Incoming material deliveries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryLine {
    pub material_id: String,
    pub qty: f64,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub account_id: String,
    pub delivered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub lines: Vec<DeliveryLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryDraft {
    pub delivered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub lines: Vec<DeliveryLine>,
}

impl DeliveryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::NoLines("delivery"));
        }
        for line in &self.lines {
            if line.material_id.is_empty() {
                return Err(ValidationError::Empty("delivery line material id"));
            }
            if line.qty < 0.0 {
                return Err(ValidationError::Negative("delivery line quantity"));
            }
            if line.unit_cost < 0.0 {
                return Err(ValidationError::Negative("delivery line unit cost"));
            }
        }
        Ok(())
    }
}
