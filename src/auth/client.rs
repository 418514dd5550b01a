use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use url::Url;

use super::{
    chunker::{combine_chunks, create_chunks, existing_chunk_names},
    cookies::{CookieMethods, CookieOptions},
    error::{AuthError, ConfigError},
    session::{decode_session, default_storage_key, encode_session, Session},
};
use crate::configuration::AuthSettings;

/// Which sessions a sign-out revokes on the provider side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignOutScope {
    /// Every session of the user.
    #[default]
    Global,
    /// Only the current session.
    Local,
    /// Every session except the current one. Local cookies are kept.
    Others,
}

impl SignOutScope {
    fn as_str(&self) -> &'static str {
        match self {
            SignOutScope::Global => "global",
            SignOutScope::Local => "local",
            SignOutScope::Others => "others",
        }
    }
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

/// Client for the hosted auth service, bound to one request's cookies.
pub struct AuthClient<C> {
    http: reqwest::Client,
    base_url: String,
    anon_key: Secret<String>,
    storage_key: String,
    cookie_options: CookieOptions,
    cookies: C,
    session: Option<Session>,
    loaded: bool,
}

impl<C: CookieMethods> AuthClient<C> {
    pub fn new(http: reqwest::Client, settings: &AuthSettings, cookies: C) -> Result<Self, ConfigError> {
        let url = settings.url.as_deref().ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = settings
            .anon_key
            .clone()
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let parsed = Url::parse(url)?;
        let storage_key = match &settings.storage_key {
            Some(key) => key.clone(),
            None => default_storage_key(&parsed)?,
        };
        let cookie_options = CookieOptions {
            domain: settings.cookie_domain.clone(),
            secure: settings.cookie_secure,
            ..CookieOptions::default()
        };

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_owned(),
            anon_key,
            storage_key,
            cookie_options,
            cookies,
            session: None,
            loaded: false,
        })
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the session stored in the request's cookies, refreshing it
    /// first when it has expired.
    ///
    /// Absent, unreadable and no-longer-refreshable sessions all come back as
    /// `None`; the latter two also have their cookies removed.
    pub async fn get_session(&mut self) -> Result<Option<Session>, AuthError> {
        let session = self.load_session().await?;
        self.session = session.clone();
        self.loaded = true;
        Ok(session)
    }

    async fn load_session(&mut self) -> Result<Option<Session>, AuthError> {
        let raw = match combine_chunks(&self.storage_key, &self.cookies) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let session = match decode_session(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("discarding unreadable session cookie: {e}");
                self.remove_session();
                return Ok(None);
            }
        };

        if !session.is_expired(chrono::Utc::now().timestamp()) {
            return Ok(Some(session));
        }

        tracing::debug!("session for user {} expired, refreshing", session.user.id);
        self.refresh_session(&session.refresh_token).await
    }

    async fn refresh_session(&mut self, refresh_token: &str) -> Result<Option<Session>, AuthError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(self.anon_key.expose_secret())
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let error = AuthError::from_response(response).await;
            tracing::info!("refresh token rejected, dropping session: {error}");
            self.remove_session();
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::from_response(response).await);
        }

        let mut session: Session = response.json().await?;
        if session.expires_at.is_none() {
            session.expires_at = Some(chrono::Utc::now().timestamp().saturating_add(session.expires_in));
        }
        self.save_session(&session)?;
        Ok(Some(session))
    }

    /// Revokes the current session with the provider and clears its cookies.
    ///
    /// A provider answer of 401, 403 or 404 means the session is already gone
    /// and still counts as success. Other failures leave the cookies alone.
    pub async fn sign_out(&mut self, scope: SignOutScope) -> Result<(), AuthError> {
        if !self.loaded {
            self.get_session().await?;
        }

        if let Some(access_token) = self.session.as_ref().map(|s| s.access_token.clone()) {
            let response = self
                .http
                .post(format!("{}/auth/v1/logout", self.base_url))
                .query(&[("scope", scope.as_str())])
                .header("apikey", self.anon_key.expose_secret())
                .bearer_auth(access_token)
                .send()
                .await?;

            let status = response.status();
            match status {
                s if s.is_success() => {}
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                    tracing::debug!("session already revoked ({status})");
                }
                _ => return Err(AuthError::from_response(response).await),
            }
        }

        if scope != SignOutScope::Others {
            self.remove_session();
        }
        Ok(())
    }

    pub fn into_cookies(self) -> C {
        self.cookies
    }

    fn save_session(&mut self, session: &Session) -> Result<(), AuthError> {
        let value = encode_session(session)?;
        let chunks = create_chunks(&self.storage_key, &value);

        for name in existing_chunk_names(&self.storage_key, &self.cookies) {
            if !chunks.iter().any(|(chunk, _)| *chunk == name) {
                self.cookies.remove(&name, &self.cookie_options);
            }
        }
        for (name, chunk) in &chunks {
            self.cookies.set(name, chunk, &self.cookie_options);
        }
        Ok(())
    }

    fn remove_session(&mut self) {
        for name in existing_chunk_names(&self.storage_key, &self.cookies) {
            self.cookies.remove(&name, &self.cookie_options);
        }
        self.session = None;
    }
}
