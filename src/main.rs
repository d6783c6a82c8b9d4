use photohub::config::{AppConfig, StorageBackend};
use photohub::routes::create_router;
use photohub::state::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    start_server(config).await
}

async fn start_server(config: AppConfig) -> color_eyre::Result<()> {
    let state = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&config.database_url())
                .await?;
            sqlx::migrate!().run(&pool).await?;
            AppState::postgres(config, pool)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; nothing will survive a restart");
            let (state, _store) = AppState::in_memory(config);
            state
        }
    };

    tokio::fs::create_dir_all(&state.config.upload_dir).await?;

    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
