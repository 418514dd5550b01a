use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::ConfigError;

const BASE64_PREFIX: &str = "base64-";

/// Sessions expiring sooner than this are refreshed before use.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    pub expires_at: Option<i64>,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn bearer() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at.saturating_sub(now) <= EXPIRY_MARGIN_SECS,
            None => true,
        }
    }

    fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty() && self.expires_at.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("session cookie is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("session cookie is not a valid session: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session cookie is missing tokens or expiry")]
    Incomplete,
}

pub fn encode_session(session: &Session) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(session)?;
    Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}

/// Accepts both the `base64-` form written by [`encode_session`] and plain JSON.
pub fn decode_session(value: &str) -> Result<Session, DecodeError> {
    let session: Session = match value.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => {
            let bytes = URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('='))?;
            serde_json::from_slice(&bytes)?
        }
        None => serde_json::from_str(value)?,
    };

    if !session.is_valid() {
        return Err(DecodeError::Incomplete);
    }
    Ok(session)
}

/// `sb-<project ref>-auth-token`, where the project ref is the first label of
/// the service host.
pub fn default_storage_key(url: &Url) -> Result<String, ConfigError> {
    let host = url.host_str().ok_or(ConfigError::NoHost)?;
    let project_ref = host.split('.').next().unwrap_or(host);
    Ok(format!("sb-{project_ref}-auth-token"))
}
