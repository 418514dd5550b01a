use crate::configuration::AuthSettings;

#[derive(Clone, axum_macros::FromRef)]
pub struct AppState {
    pub auth: AuthSettings,
    pub http: reqwest::Client,
}
