use reqwest::StatusCode;

/// The auth client could not be built from the configured settings.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing required auth setting `{0}`")]
    Missing(&'static str),
    #[error("invalid auth service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("auth service url has no host")]
    NoHost,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("request to auth service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("auth service responded with {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AuthError {
    /// Builds an `Api` error out of a non-success response, picking the first
    /// message field the provider filled in.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                ["msg", "message", "error_description", "error"]
                    .iter()
                    .find_map(|key| value.get(key).and_then(|m| m.as_str()).map(str::to_owned))
            })
            .unwrap_or(body);

        AuthError::Api { status, message }
    }
}
