//! Daily usage reports filed by crews.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLine {
    pub material_id: String,
    pub qty_used: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub id: String,
    pub account_id: String,
    pub report_date: NaiveDate,
    pub author_member_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub lines: Vec<UsageLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportDraft {
    pub report_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub lines: Vec<UsageLine>,
}

impl DailyReportDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::NoLines("daily report"));
        }
        for line in &self.lines {
            if line.material_id.is_empty() {
                return Err(ValidationError::Empty("usage line material id"));
            }
            if line.qty_used < 0.0 {
                return Err(ValidationError::Negative("usage line quantity"));
            }
        }
        Ok(())
    }
}
