use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use joycycles_phase_engine::{
    app,
    store::{CycleStore, MemoryCycleStore, PgCycleStore},
    AppConfig, AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let store: Arc<dyn CycleStore> = match config.database_url.as_deref() {
        Some(url) => {
            let store = PgCycleStore::connect(url, config.max_connections).await?;
            if config.run_migrations {
                store.migrate().await?;
                tracing::info!("📦 Migrations applied");
            }
            Arc::new(store)
        }
        None => {
            tracing::warn!("⚠️ DATABASE_URL not set, keeping cycle history in memory");
            Arc::new(MemoryCycleStore::new())
        }
    };

    let app = app(AppState::new(store));

    tracing::info!("🧠 Server running at {}", config.bind_addr);

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
