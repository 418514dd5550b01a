use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::{AuthError, ConfigError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    Configuration { source: ConfigError },
    Auth { source: AuthError },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration { source } => write!(f, "Auth client misconfigured: {source}"),
            Error::Auth { source } => write!(f, "Auth service error: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration { source } => Some(source),
            Error::Auth { source } => Some(source),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(source: ConfigError) -> Self {
        Error::Configuration { source }
    }
}

impl From<AuthError> for Error {
    fn from(source: AuthError) -> Self {
        Error::Auth { source }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{self}");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
