use std::sync::Arc;

use anyhow::{Context, Result};
use siteward_infra::{HttpBackendRpc, JsonlGateAudit, TenantCookieCodec};
use siteward_server::{router, AppState, RateLimiter};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("SITEWARD_CONFIG").unwrap_or_else(|_| "siteward.toml".to_string());
    let config = Config::load(&config_path)?;

    // The cookie secret never lives in the config file.
    let cookie_secret = std::env::var("SITEWARD_COOKIE_SECRET")
        .context("SITEWARD_COOKIE_SECRET must be set")?;

    let rpc = Arc::new(HttpBackendRpc::new(
        &config.backend.base_url,
        &config.backend.service_key,
    ));
    let audit = Arc::new(
        JsonlGateAudit::new(&config.audit_log)
            .with_context(|| format!("Failed to open {}", config.audit_log.display()))?,
    );
    let cookies = Arc::new(TenantCookieCodec::new(cookie_secret.into_bytes()));
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.per_second,
        config.rate_limit.burst,
    ));

    let app = router(AppState::new(rpc, audit, cookies, limiter));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("siteward listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;
    Ok(())
}
