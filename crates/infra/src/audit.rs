//! Append-only audit trail of gate evaluations.
//!
//! Both outcomes are recorded. Audit failure must never change the outcome
//! of the operation it describes; callers log and drop the error.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateOutcome {
    Allow,
    Deny,
}

/// One gate evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateRecord {
    pub timestamp: String,
    pub request_id: String,
    pub account_id: Option<String>,
    pub role: Option<String>,
    pub operation: String,
    pub required: Vec<String>,
    pub outcome: GateOutcome,
}

pub trait GateAudit: Send + Sync {
    fn record(&self, record: &GateRecord) -> Result<(), AuditError>;
}

/// File-backed JSONL sink, one record per line.
pub struct JsonlGateAudit {
    #[allow(dead_code)]
    log_path: PathBuf,
    file: Mutex<File>,
}

impl JsonlGateAudit {
    pub fn new<P: AsRef<Path>>(log_path: P) -> Result<Self, AuditError> {
        let log_path = log_path.as_ref().to_path_buf();

        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            log_path,
            file: Mutex::new(file),
        })
    }
}

impl GateAudit for JsonlGateAudit {
    fn record(&self, record: &GateRecord) -> Result<(), AuditError> {
        let json = serde_json::to_string(record)?;
        let mut file = self.file.lock();
        writeln!(file, "{}", json)?;
        file.sync_all()?;
        Ok(())
    }
}
