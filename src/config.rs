//! Configuration module
//!
//! `AppConfig` is read from a TOML file (default
//! `~/.config/nwsl-api/config.toml`). Every section is optional; missing
//! values fall back to the defaults below. `DATABASE_URL` and `PORT`
//! environment variables override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding an explicit config file path
pub const CONFIG_PATH_ENV: &str = "NWSL_API_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default config location: `~/.config/nwsl-api/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nwsl-api")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub dataset: DatasetConfig,
    pub cors: CorsConfig,
    pub public: PublicConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut cfg = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.database.url = Some(url);
            }
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            shutdown_timeout: 30,
        }
    }
}

/// Database connection and pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Full connection URL. When set, the discrete fields below are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    /// Log every SQL statement at debug level
    pub sqlx_logging: bool,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    /// Connection URL with the password replaced, for logging
    pub fn redacted_url(&self) -> String {
        match &self.url {
            Some(url) => redact_password(url),
            None => format!(
                "postgres://{}:***@{}:{}/{}",
                self.user, self.host, self.port, self.name
            ),
        }
    }
}

fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "127.0.0.1".to_string(),
            port: 5433,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "nwsl_data".to_string(),
            min_connections: 10,
            max_connections: 20,
            connect_timeout_secs: 10,
            acquire_timeout_secs: 60,
            sqlx_logging: false,
        }
    }
}

/// API key settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Request header carrying the API key
    pub header_name: String,
    /// Shared key that bypasses the store (no usage tracking)
    pub demo_key: String,
    pub key_prefix: String,
    pub key_mode: String,
    /// Ceiling recorded on new keys. Not enforced.
    pub default_rate_limit: i32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_name: "X-API-Key".to_string(),
            demo_key: "nwsl-demo-key-2024".to_string(),
            key_prefix: "nwsl".to_string(),
            key_mode: "live".to_string(),
            default_rate_limit: 1000,
        }
    }
}

/// Page-size bounds for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Bounds for per-player / per-venue match lists
    pub nested_default_page_size: u64,
    pub nested_max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            max_page_size: 1000,
            nested_default_page_size: 50,
            nested_max_page_size: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Season used by the goals leaderboard when none is requested
    pub current_season: i32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            current_season: 2025,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://nwsldata.com".to_string(),
                "https://www.nwsldata.com".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:8000".to_string(),
            ],
        }
    }
}

/// Public-facing URLs used in response bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicConfig {
    pub base_url: String,
}

impl Default for PublicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nwsldata.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
