pub mod dataset;
pub mod entities;
pub mod migrator;
pub mod query;
pub mod repositories;

pub use dataset::DatasetReader;
pub use query::FilterBuilder;
pub use repositories::ApiKeyRepository;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseSettings;

/// Open the connection pool described by `settings`
pub async fn init_database(settings: &DatabaseSettings) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", settings.redacted_url());

    let mut options = ConnectOptions::new(settings.connection_url());
    options
        .min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .sqlx_logging(settings.sqlx_logging);

    let db = Database::connect(options).await?;
    info!(
        "Database connected (pool {}..={})",
        settings.min_connections, settings.max_connections
    );
    Ok(db)
}
