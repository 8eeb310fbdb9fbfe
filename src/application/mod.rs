//! Application layer: use cases over the domain ports

pub mod api_keys;

pub use api_keys::{check_rate_limit, ApiKeyService, RateLimitStatus};
