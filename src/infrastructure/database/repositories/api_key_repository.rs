use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::debug;

use crate::domain::{ApiKey, ApiKeyRepositoryInterface, DomainError, DomainResult, NewApiKey};
use crate::infrastructure::database::entities::api_key;

pub struct ApiKeyRepository {
    db: DatabaseConnection,
}

impl ApiKeyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn api_key_model_to_domain(model: api_key::Model) -> ApiKey {
    ApiKey {
        id: model.id,
        key_hint: model.key_hint,
        name: model.name,
        email: model.email,
        created_at: model.created_at,
        last_used: model.last_used,
        usage_count: model.usage_count,
        is_active: model.is_active,
        rate_limit: model.rate_limit,
    }
}

#[async_trait]
impl ApiKeyRepositoryInterface for ApiKeyRepository {
    async fn create(&self, key: NewApiKey) -> DomainResult<ApiKey> {
        let row = api_key::ActiveModel {
            id: Set(key.id),
            key_hash: Set(key.key_hash),
            key_hint: Set(key.key_hint),
            name: Set(key.name),
            email: Set(key.email),
            created_at: Set(key.created_at),
            last_used: Set(None),
            usage_count: Set(0),
            is_active: Set(true),
            rate_limit: Set(key.rate_limit),
        };

        let model = row.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(
                "You already have an API key with this name. Use a different name or retrieve your existing key."
                    .to_string(),
            ),
            _ => DomainError::from(e),
        })?;

        Ok(api_key_model_to_domain(model))
    }

    async fn record_use(&self, key_hash: &str, now: DateTime<Utc>) -> DomainResult<Option<ApiKey>> {
        // Single UPDATE .. RETURNING so concurrent uses of one key never lose an increment
        let stmt = Query::update()
            .table(api_key::Entity)
            .value(api_key::Column::LastUsed, now)
            .value(
                api_key::Column::UsageCount,
                Expr::col(api_key::Column::UsageCount).add(1),
            )
            .and_where(api_key::Column::KeyHash.eq(key_hash))
            .and_where(api_key::Column::IsActive.eq(true))
            .returning_all()
            .to_owned();

        let backend = self.db.get_database_backend();
        let model = api_key::Entity::find()
            .from_raw_sql(backend.build(&stmt))
            .one(&self.db)
            .await?;

        Ok(model.map(api_key_model_to_domain))
    }

    async fn list_by_email(&self, email: &str) -> DomainResult<Vec<ApiKey>> {
        let models = api_key::Entity::find()
            .filter(api_key::Column::Email.eq(email))
            .order_by_desc(api_key::Column::CreatedAt)
            .order_by_desc(api_key::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(api_key_model_to_domain).collect())
    }

    async fn deactivate(&self, id: &str, email: &str) -> DomainResult<bool> {
        let result = api_key::Entity::update_many()
            .col_expr(api_key::Column::IsActive, Expr::value(false))
            .filter(api_key::Column::Id.eq(id))
            .filter(api_key::Column::Email.eq(email))
            .exec(&self.db)
            .await?;

        debug!(key_id = %id, rows = result.rows_affected, "deactivate api key");
        Ok(result.rows_affected > 0)
    }
}
