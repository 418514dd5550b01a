use axum::Router;
use std::net::TcpListener;

pub mod auth;
pub mod configuration;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use configuration::Settings;
use state::AppState;

pub fn build_service(settings: Settings) -> anyhow::Result<(Router, TcpListener)> {
    let router = get_router(&settings)?;

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = TcpListener::bind(&addr).map_err(|e| {
        tracing::error!("unable to bind {addr}: {e}");
        e
    })?;

    Ok((router, listener))
}

pub async fn serve(app: Router, listener: TcpListener) -> anyhow::Result<()> {
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn get_router(settings: &Settings) -> anyhow::Result<Router> {
    let http = reqwest::Client::builder()
        .timeout(settings.auth.timeout())
        .build()?;

    if settings.auth.url.is_none() || settings.auth.anon_key.is_none() {
        tracing::warn!("auth service url or anon key not configured; sign-out requests will fail");
    }

    let state = AppState {
        auth: settings.auth.clone(),
        http,
    };

    Ok(Router::new()
        .nest("/auth", routes::routes())
        .with_state(state))
}
