use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored API key. The secret itself is never part of this record,
/// only its digest (kept by the store) and a masked hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKey {
    pub id: String,
    pub key_hint: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
    pub usage_count: i64,
    pub is_active: bool,
    pub rate_limit: i32,
}

/// Everything the store needs to persist a freshly issued key
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub id: String,
    pub key_hash: String,
    pub key_hint: String,
    pub name: String,
    pub email: String,
    pub rate_limit: i32,
    pub created_at: DateTime<Utc>,
}

/// A key value together with its stored record, returned once at issuance
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub key: String,
    pub record: ApiKey,
}

/// Identity of an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<i64>,
    #[serde(skip)]
    pub is_demo: bool,
}

impl Caller {
    pub const DEMO_NAME: &'static str = "Demo User";
    pub const DEMO_EMAIL: &'static str = "demo@nwsl-api.com";

    /// The synthetic identity behind the shared demo key
    pub fn demo() -> Self {
        Self {
            name: Self::DEMO_NAME.to_string(),
            email: Self::DEMO_EMAIL.to_string(),
            rate_limit: None,
            usage_count: None,
            is_demo: true,
        }
    }

    pub fn from_key(key: &ApiKey) -> Self {
        Self {
            name: key.name.clone(),
            email: key.email.clone(),
            rate_limit: Some(key.rate_limit),
            usage_count: Some(key.usage_count),
            is_demo: false,
        }
    }
}
