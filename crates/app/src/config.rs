use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub backend: BackendConfig,
    #[serde(default = "default_audit_log")]
    pub audit_log: PathBuf,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub service_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub per_second: f64,
    pub burst: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 10.0,
            burst: 30.0,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_audit_log() -> PathBuf {
    PathBuf::from("./data/gate_audit.jsonl")
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
