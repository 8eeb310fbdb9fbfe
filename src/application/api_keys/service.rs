//! API key lifecycle: issuance, verification, listing and revocation

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::domain::{
    ApiKey, ApiKeyRepositoryInterface, Caller, DomainError, DomainResult, IssuedApiKey, NewApiKey,
};
use crate::infrastructure::crypto::{generate_api_key, hash_api_key};

pub const MISSING_KEY_MESSAGE: &str = "API key required. Get one at /register";
pub const INVALID_KEY_MESSAGE: &str = "Invalid API key";

pub struct ApiKeyService {
    repo: Arc<dyn ApiKeyRepositoryInterface>,
    settings: AuthConfig,
}

impl ApiKeyService {
    pub fn new(repo: Arc<dyn ApiKeyRepositoryInterface>, settings: AuthConfig) -> Self {
        Self { repo, settings }
    }

    pub fn settings(&self) -> &AuthConfig {
        &self.settings
    }

    /// Issue a new key for `(name, email)`. The returned key value is the
    /// only copy that ever leaves the service.
    pub async fn issue(&self, name: &str, email: &str) -> DomainResult<IssuedApiKey> {
        let generated = generate_api_key(&self.settings.key_prefix, &self.settings.key_mode);

        let record = self
            .repo
            .create(NewApiKey {
                id: uuid::Uuid::new_v4().to_string(),
                key_hash: generated.key_hash,
                key_hint: generated.hint,
                name: name.to_string(),
                email: email.to_string(),
                rate_limit: self.settings.default_rate_limit,
                created_at: Utc::now(),
            })
            .await?;

        info!(key_id = %record.id, email = %record.email, "API key issued");
        metrics::counter!("api_keys_issued_total").increment(1);

        Ok(IssuedApiKey {
            key: generated.key,
            record,
        })
    }

    /// Resolve the caller behind a presented token.
    ///
    /// The demo key short-circuits without touching the store. Any other
    /// token has its usage recorded in the same statement that checks it.
    /// Keys stay valid across changes to the configured prefix or mode.
    pub async fn verify(&self, token: Option<&str>) -> DomainResult<Caller> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            metrics::counter!("api_key_verifications_total", "outcome" => "missing").increment(1);
            return Err(DomainError::Forbidden(MISSING_KEY_MESSAGE.to_string()));
        };

        if token == self.settings.demo_key {
            metrics::counter!("api_key_verifications_total", "outcome" => "demo").increment(1);
            return Ok(Caller::demo());
        }

        match self.repo.record_use(&hash_api_key(token), Utc::now()).await? {
            Some(key) => {
                metrics::counter!("api_key_verifications_total", "outcome" => "ok").increment(1);
                Ok(Caller::from_key(&key))
            }
            None => {
                metrics::counter!("api_key_verifications_total", "outcome" => "invalid").increment(1);
                Err(DomainError::Forbidden(INVALID_KEY_MESSAGE.to_string()))
            }
        }
    }

    /// All keys registered under `email`, newest first
    pub async fn list(&self, email: &str) -> DomainResult<Vec<ApiKey>> {
        let keys = self.repo.list_by_email(email).await?;
        if keys.is_empty() {
            return Err(DomainError::not_found("No API keys found for this email"));
        }
        Ok(keys)
    }

    /// Soft-delete a key. Ownership is established by the email alone.
    pub async fn revoke(&self, key_id: &str, email: &str) -> DomainResult<()> {
        if self.repo.deactivate(key_id, email).await? {
            info!(key_id = %key_id, "API key revoked");
            Ok(())
        } else {
            warn!(key_id = %key_id, "Revocation refused: no key with this id for this email");
            Err(DomainError::not_found(
                "API key not found or you don't have permission to revoke it",
            ))
        }
    }
}
