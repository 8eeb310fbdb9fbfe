//! API key aggregate
//!
//! Contains the ApiKey record, the authenticated caller identity, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{ApiKey, Caller, IssuedApiKey, NewApiKey};
pub use repository::ApiKeyRepositoryInterface;
