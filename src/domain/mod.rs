pub mod api_key;
pub mod error;

pub use api_key::{ApiKey, ApiKeyRepositoryInterface, Caller, IssuedApiKey, NewApiKey};
pub use error::{DomainError, DomainResult};
