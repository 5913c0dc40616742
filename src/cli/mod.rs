use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use crate::auth::google::GoogleProvider;
use crate::config::AppConfig;
use crate::database::Store;
use crate::storage::DirectoryBlobStore;
use crate::{app, AppState};

#[derive(Parser)]
#[command(name = "item-catalog")]
#[command(about = "Item catalog web application and JSON API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Bind host (overrides CATALOG_HOST)")]
    pub host: Option<String>,

    #[arg(long, global = true, help = "Bind port (overrides CATALOG_PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run migrations and serve HTTP (default)")]
    Serve,

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

impl Cli {
    /// Command-line flags win over the environment
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    cli.apply(&mut config);

    let store = Store::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    store.migrate().await.context("failed to apply migrations")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            tracing::info!("Migrations applied to {}", config.database.url);
            store.close().await;
            Ok(())
        }
        Commands::Serve => serve(config, store).await,
    }
}

async fn serve(config: AppConfig, store: Store) -> anyhow::Result<()> {
    let blobs = DirectoryBlobStore::open(&config.uploads.directory)
        .await
        .with_context(|| format!("failed to open upload directory {:?}", config.uploads.directory))?;
    if config.oauth.client_id.is_empty() {
        tracing::warn!("GOOGLE_CLIENT_ID is not set; browser login will fail");
    }
    let identity = Arc::new(GoogleProvider::new(&config.oauth));

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store.clone(), Arc::new(blobs), identity);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Item catalog listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::parse_from(["item-catalog"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.host, None);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["item-catalog", "--port", "8080", "migrate"]);
        assert_eq!(cli.command, Some(Commands::Migrate));

        let mut config = AppConfig::development();
        cli.apply(&mut config);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, AppConfig::development().server.host);
    }
}
