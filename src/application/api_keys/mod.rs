pub mod rate_limit;
pub mod service;

pub use rate_limit::{check_rate_limit, RateLimitStatus};
pub use service::ApiKeyService;
