//! Daybook - personal productivity tracker backend
//!
//! Serves the goals, habits and notes REST API over a local SQLite file.

use daybook_api::{AppState, Server};
use daybook_core::{AuthService, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::Config;

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    tracing::info!("Starting Daybook");

    if let Err(e) = run(config).await {
        tracing::error!("Failed to run server: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config.database_path()?;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::open(&db_path)?;
    let auth = AuthService::new(config.auth)?;
    let state = AppState::new(db, auth).with_ping_message(config.server.ping_message.clone());

    let server = Server::start(config.server.bind, state).await?;
    tracing::info!(addr = %server.addr(), db = %db_path.display(), "Listening");

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;

    tracing::info!("Daybook stopped");
    Ok(())
}
