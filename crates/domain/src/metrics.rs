//! Read-only reporting projections. Both series are computed by backend
//! views; rows arrive fully aggregated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Designer-plan versus actual usage, one row per material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvrSummaryRow {
    pub material_id: String,
    pub material_name: String,
    pub planned_qty: f64,
    pub actual_qty: f64,
    pub variance_qty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance_pct: Option<f64>,
}

/// One period of the shrinkage series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrinkPoint {
    pub period_start: NaiveDate,
    pub expected_qty: f64,
    pub counted_qty: f64,
    pub shrink_qty: f64,
    pub shrink_value: f64,
}

/// Inclusive date range for the shrinkage query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShrinkRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
