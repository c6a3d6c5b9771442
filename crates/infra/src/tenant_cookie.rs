//! Signed tenant-selection cookie.
//!
//! The cookie is the only authorization-relevant state this subsystem ever
//! writes; everything else reads it. Value format is
//! `base64(account_id|expires_unix) . base64(sha256(secret . payload))`.
//! Verification recomputes the tag and compares in constant time, so a
//! tampered or truncated value is indistinguishable from an absent one to
//! the caller.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Cookie name read by every request and written only by account selection.
pub const ACCOUNT_COOKIE: &str = "siteward_account";

const COOKIE_TTL_DAYS: i64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("cookie value is malformed")]
    Malformed,

    #[error("cookie signature does not verify")]
    BadSignature,

    #[error("cookie has expired")]
    Expired,
}

pub struct TenantCookieCodec {
    secret: Vec<u8>,
}

impl TenantCookieCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn tag(&self, payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b".");
        hasher.update(payload);
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    /// Sign an account selection valid for 30 days from `now`.
    pub fn encode(&self, account_id: &str, now: DateTime<Utc>) -> String {
        let expires = (now + Duration::days(COOKIE_TTL_DAYS)).timestamp();
        let payload = format!("{account_id}|{expires}");
        let tag = self.tag(payload.as_bytes());
        format!("{}.{}", URL_SAFE_NO_PAD.encode(payload.as_bytes()), tag)
    }

    /// Verify a cookie value and return the selected account id.
    pub fn decode(&self, value: &str, now: DateTime<Utc>) -> Result<String, CookieError> {
        let (payload_b64, tag) = value.split_once('.').ok_or(CookieError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| CookieError::Malformed)?;

        if !constant_time_eq(self.tag(&payload).as_bytes(), tag.as_bytes()) {
            return Err(CookieError::BadSignature);
        }

        let payload = String::from_utf8(payload).map_err(|_| CookieError::Malformed)?;
        let (account_id, expires) = payload.rsplit_once('|').ok_or(CookieError::Malformed)?;
        let expires: i64 = expires.parse().map_err(|_| CookieError::Malformed)?;

        if now.timestamp() >= expires {
            return Err(CookieError::Expired);
        }
        if account_id.is_empty() {
            return Err(CookieError::Malformed);
        }
        Ok(account_id.to_string())
    }

    /// Full `Set-Cookie` header value for a selection made at `now`.
    pub fn set_cookie_header(&self, account_id: &str, now: DateTime<Utc>) -> String {
        let value = self.encode(account_id, now);
        let max_age = Duration::days(COOKIE_TTL_DAYS).num_seconds();
        format!(
            "{ACCOUNT_COOKIE}={value}; Max-Age={max_age}; Path=/; HttpOnly; Secure; SameSite=Lax"
        )
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
