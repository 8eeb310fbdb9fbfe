//! # NWSL Data API
//!
//! REST API over a read-only NWSL statistics dataset, gated by self-service
//! API keys.
//!
//! ## Architecture
//!
//! - **domain**: API key model, store port and error taxonomy
//! - **application**: key issuance, verification and revocation
//! - **infrastructure**: key hashing, database pool, migrations, the API key
//!   store and the dataset reader with its filtered query builder
//! - **interfaces**: axum routers, middleware and handlers with Swagger docs
//! - **shared**: pagination and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, ApiKeyRepository, DatasetReader};

// Re-export API router
pub use interfaces::http::create_api_router;
