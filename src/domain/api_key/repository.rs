use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ApiKey, NewApiKey};
use crate::domain::DomainResult;

#[async_trait]
pub trait ApiKeyRepositoryInterface: Send + Sync {
    /// Fails with `Conflict` when the (email, name) pair is already taken.
    async fn create(&self, key: NewApiKey) -> DomainResult<ApiKey>;

    /// Atomically bumps `usage_count` and `last_used` on the active key with
    /// this digest and returns the updated row.
    async fn record_use(&self, key_hash: &str, now: DateTime<Utc>) -> DomainResult<Option<ApiKey>>;

    /// Newest first.
    async fn list_by_email(&self, email: &str) -> DomainResult<Vec<ApiKey>>;

    /// Returns whether a key with this id owned by `email` exists.
    async fn deactivate(&self, id: &str, email: &str) -> DomainResult<bool>;
}
