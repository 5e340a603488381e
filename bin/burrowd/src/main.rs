//! `burrowd` — the burrow server binary.
//!
//! Usage:
//!   burrowd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/burrow/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use config::ServerConfig;
use social::service::SocialConfig;

/// burrow server.
#[derive(Parser, Debug)]
#[command(name = "burrowd", about = "burrow social API server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = burrow_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: cli
            .listen
            .unwrap_or_else(|| server_config.server.listen.clone()),
        ..Default::default()
    };

    // Initialize embedded stores (shared by all modules).
    let kv: Arc<dyn burrow_kv::KVStore> = Arc::new(
        burrow_kv::RedbStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    let sql: Arc<dyn burrow_sql::SQLStore> = Arc::new(
        burrow_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Principal resolution: burrowd trusts the x-account-id header set by
    // the verifying gateway in front of it.
    let resolver: Arc<dyn burrow_core::PrincipalResolver> =
        Arc::new(burrow_core::HeaderResolver);

    let social_module = social::SocialModule::new(
        sql,
        kv,
        resolver,
        SocialConfig {
            guardian_cache_ttl: server_config.guardian.cache_ttl,
        },
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize social module: {}", e))?;

    let app = routes::build_router(vec![&social_module as &dyn burrow_core::Module]);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("burrowd listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
