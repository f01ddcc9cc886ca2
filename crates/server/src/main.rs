use anyhow::{Context, Result};
use organizer_server::api::{AppState, run_api};
use organizer_server::config::loader;
use organizer_server::db;
use organizer_server::supervisor::Supervisor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("organizer_server=info,tower_http=info")),
        )
        .init();

    let config = loader::load()?;
    let bind = config
        .server
        .bind_addr()
        .map_err(anyhow::Error::msg)
        .context("Invalid bind address")?;
    let base_url = config
        .server
        .base_url()
        .map_err(anyhow::Error::msg)
        .context("Invalid public URL")?;

    let pool = db::init_pool(&config.database).await?;
    let state = AppState::new(pool, base_url);

    let mut supervisor = Supervisor::new();
    supervisor.spawn("api", move |shutdown| run_api(state, bind, shutdown));
    supervisor.run().await
}
