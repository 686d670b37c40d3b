use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use restro_api::auth::TokenKeys;
use restro_api::config;
use restro_api::database::{
    AdminRepository, DatabaseManager, MemoryAdminRepository, MemoryRestaurantRepository,
    PgAdminRepository, PgRestaurantRepository, RestaurantRepository,
};
use restro_api::state::AppState;
use restro_api::upload::{BlobStore, CloudinaryStore, MemoryBlobStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Storage {
    /// Postgres via DATABASE_URL
    Postgres,
    /// Process memory; everything is lost on exit
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "restro-api")]
#[command(about = "Restaurant listing backend")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// Document store backend
    #[arg(long, value_enum, env = "RESTRO_STORAGE", default_value = "postgres")]
    storage: Storage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET and CLOUDINARY_* are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting Restro API in {:?} mode", config.environment);

    let tokens = TokenKeys::from_config(&config.security).context("JWT_SECRET must be set")?;

    let blobs: Arc<dyn BlobStore> = match &config.upload.cloudinary {
        Some(cloudinary) => Arc::new(CloudinaryStore::new(cloudinary.clone())?),
        None => {
            tracing::warn!("CLOUDINARY_* not set; images are kept in process memory");
            Arc::new(MemoryBlobStore::new(config.upload.memory_base_url.clone()))
        }
    };

    let mut database = None;
    let (restaurants, admins): (Arc<dyn RestaurantRepository>, Arc<dyn AdminRepository>) =
        match args.storage {
            Storage::Postgres => {
                let manager = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to Postgres")?;
                manager.ensure_schema().await?;
                let repos = (
                    Arc::new(PgRestaurantRepository::new(manager.pool())) as Arc<dyn RestaurantRepository>,
                    Arc::new(PgAdminRepository::new(manager.pool())) as Arc<dyn AdminRepository>,
                );
                database = Some(manager);
                repos
            }
            Storage::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on exit");
                (
                    Arc::new(MemoryRestaurantRepository::new()) as Arc<dyn RestaurantRepository>,
                    Arc::new(MemoryAdminRepository::new()) as Arc<dyn AdminRepository>,
                )
            }
        };

    let state = AppState::new(restaurants, admins, blobs, tokens, config);
    let app = restro_api::app(state, config);

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Restro API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
