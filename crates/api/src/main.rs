use std::sync::Arc;
use std::time::Duration;

use pressroom_api::app::{self, services};
use pressroom_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pressroom_observability::init();

    let config = AppConfig::from_env();
    let services = Arc::new(services::build_services(&config)?);

    services::spawn_session_purge(
        services.store.clone(),
        config.session_max_idle,
        Duration::from_secs(60),
    );

    let app = app::build_app(services);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
