use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Connection details for the hosted auth provider.
///
/// `url` and `anon_key` are optional here on purpose: they are checked when an
/// [`AuthClient`](crate::auth::client::AuthClient) is built for a request, so a
/// missing value fails that request rather than the whole process.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthSettings {
    pub url: Option<String>,
    pub anon_key: Option<Secret<String>>,
    pub storage_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_milliseconds: u64,
    pub cookie_domain: Option<String>,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl AuthSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout() -> u64 {
    10_000
}

/// Reads `APP_*` and `SUPABASE_*` variables, after loading a `.env` file if present.
pub fn get_configuration() -> Result<Settings, envy::Error> {
    dotenv::dotenv().ok();

    let application = envy::prefixed("APP_").from_env::<ApplicationSettings>()?;
    let auth = envy::prefixed("SUPABASE_").from_env::<AuthSettings>()?;

    Ok(Settings { application, auth })
}
