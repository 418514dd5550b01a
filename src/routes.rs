use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::{AuthClient, SignOutScope},
    configuration::AuthSettings,
    error::Result,
};

pub fn routes<S>() -> Router<S>
where
    S: Send + Sync + 'static + Clone,
    AuthSettings: FromRef<S>,
    reqwest::Client: FromRef<S>,
{
    Router::new().route("/signout", get(signout))
}

/// Ends the session carried by the request's cookies, if there is one, and
/// sends the browser back to the application root either way.
pub async fn signout(
    State(settings): State<AuthSettings>,
    State(http): State<reqwest::Client>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    tracing::debug!("enter -> signout()");
    let mut client = AuthClient::new(http, &settings, jar)?;

    if let Some(session) = client.get_session().await? {
        tracing::info!("signing out user {}", session.user.id);
        client.sign_out(SignOutScope::Global).await?;
    }

    Ok((client.into_cookies(), Redirect::to("/")))
}
