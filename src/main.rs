use anyhow::Context;
use axum_signout::{
    build_service,
    configuration::get_configuration,
    serve,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("axum_signout".into(), "axum_signout=info".into(), std::io::stdout);
    init_subscriber(subscriber).map_err(|e| anyhow::anyhow!(e))?;

    let settings = get_configuration().context("failed to read configuration")?;
    let (router, listener) = build_service(settings).context("failed to build service")?;
    tracing::info!("listening on {}", listener.local_addr()?);

    serve(router, listener).await
}
