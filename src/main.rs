use conn_registry::config::Config;
use conn_registry::{MySqlConnector, Registry, format_timestamp};
use mimalloc::MiMalloc;
use sqlx::Connection;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(database = ?cfg.database, loglevel = %cfg.loglevel);

    let mut connector = MySqlConnector::new();
    if let Some(secs) = cfg.database.connect_timeout {
        connector = connector.with_timeout(Duration::from_secs(secs));
    }
    let mut registry = Registry::new(connector);

    let handle = match registry
        .initialize_from_credentials(
            cfg.database.credentials(),
            cfg.database.table_prefix.clone(),
            Some(cfg.database.encoding.as_str()),
        )
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, precondition = e.is_precondition(), "database initialization failed");
            return Err(e.into());
        }
    };

    handle.lock().await.ping().await?;

    info!(
        connected = registry.is_connected(),
        table_prefix = registry.table_prefix().unwrap_or("<none>"),
        at = %format_timestamp(None)?,
        "database ready"
    );
    Ok(())
}
