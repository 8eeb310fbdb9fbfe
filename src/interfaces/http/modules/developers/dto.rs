//! Developer access DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::ApiKey;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "My NWSL App",
    "email": "developer@example.com"
}))]
pub struct RegisterRequest {
    /// Project name; unique per email
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsageInstructions {
    pub header: String,
    pub example: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    /// The full key. It is not retrievable again.
    pub api_key: String,
    pub instructions: UsageInstructions,
}

/// A stored key as shown to its owner
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyView {
    pub id: String,
    /// First characters of the key followed by `...`
    pub key_hint: String,
    pub name: String,
    pub created_at: String,
    pub last_used: Option<String>,
    pub usage_count: i64,
    pub is_active: bool,
    pub rate_limit: i32,
}

impl From<ApiKey> for ApiKeyView {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            key_hint: key.key_hint,
            name: key.name,
            created_at: key.created_at.to_rfc3339(),
            last_used: key.last_used.map(|t| t.to_rfc3339()),
            usage_count: key.usage_count,
            is_active: key.is_active,
            rate_limit: key.rate_limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KeyListResponse {
    pub email: String,
    pub keys: Vec<ApiKeyView>,
    pub total: usize,
}

/// Owner email, from the path or the query string
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnerEmail {
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
}

impl OwnerEmail {
    pub fn new(email: String) -> Self {
        Self { email }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevokeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub documentation: String,
    pub registration: String,
    pub status: String,
    pub demo_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_email_rejects_malformed_addresses() {
        assert!(OwnerEmail::new("a@b.com".into()).validate().is_ok());
        let err = OwnerEmail::new("nope".into()).validate().unwrap_err();
        let field = &err.field_errors()["email"][0];
        assert_eq!(
            field.message.as_deref(),
            Some("value is not a valid email address")
        );
    }
}
