//! NWSL Data API server
//!
//! Reads configuration from a TOML file (`$NWSL_API_CONFIG`, or
//! ~/.config/nwsl-api/config.toml) and serves the REST API until SIGINT or
//! SIGTERM.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nwsl_api::application::ApiKeyService;
use nwsl_api::config::{AppConfig, LoggingConfig, CONFIG_PATH_ENV};
use nwsl_api::infrastructure::database::migrator::Migrator;
use nwsl_api::interfaces::http::modules::metrics::install_recorder;
use nwsl_api::shared::ShutdownCoordinator;
use nwsl_api::{create_api_router, default_config_path, init_database, ApiKeyRepository};

fn init_logging(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_logging(&cfg.logging);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting NWSL Data API v{}", env!("CARGO_PKG_VERSION"));

    // ── Prometheus metrics recorder (before any metrics calls) ──
    let prometheus_handle = install_recorder()?;
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Services ───────────────────────────────────────────────
    let repo = Arc::new(ApiKeyRepository::new(db.clone()));
    let key_service = Arc::new(ApiKeyService::new(repo, app_cfg.auth.clone()));

    let api_router = create_api_router(db.clone(), key_service, &app_cfg, prometheus_handle);

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    shutdown.start_signal_listener();

    // ── REST API server ────────────────────────────────────────
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown.signal();
    let server_stopped = shutdown.signal();
    let api_server = tokio::spawn(async move {
        let result = axum::serve(listener, api_router)
            .with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API server received shutdown signal");
            })
            .await;
        // A server that stops on its own still runs the shutdown path
        server_stopped.trigger();
        result
    });

    let drained = shutdown
        .shutdown_with_cleanup(|| async move {
            match api_server.await {
                Ok(Ok(())) => info!("REST API server stopped"),
                Ok(Err(e)) => error!("REST API server error: {}", e),
                Err(e) => error!("REST API server task panicked: {}", e),
            }
        })
        .await;
    if !drained {
        warn!("In-flight requests were still running when the drain timeout elapsed");
    }

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("NWSL Data API shutdown complete");
    Ok(())
}
