//! Read-only access to the statistics dataset
//!
//! Dataset rows are returned as JSON objects keyed by column name.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, JsonValue, Statement,
};
use std::sync::Arc;
use tracing::debug;

use super::query::FilterBuilder;
use crate::domain::{DomainError, DomainResult};
use crate::shared::{Page, PageRequest, PaginationMeta};

/// The two halves of a paginated list query
#[derive(Debug, Clone, Copy)]
pub struct PagedQuery<'a> {
    /// `SELECT COUNT(..) AS total FROM ..`, without WHERE
    pub count: &'a str,
    /// `SELECT .. FROM ..`, without WHERE
    pub select: &'a str,
    /// Must end with a unique column so pages never overlap
    pub order_by: &'a str,
}

#[derive(Clone)]
pub struct DatasetReader {
    db: Arc<DatabaseConnection>,
}

impl DatasetReader {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    /// An empty filter builder for this connection's backend
    pub fn filter(&self) -> FilterBuilder {
        FilterBuilder::new(self.backend())
    }

    pub async fn fetch_all(&self, stmt: Statement) -> DomainResult<Vec<JsonValue>> {
        debug!(sql = %stmt.sql, "dataset query");
        Ok(JsonValue::find_by_statement(stmt).all(self.db.as_ref()).await?)
    }

    pub async fn fetch_optional(&self, stmt: Statement) -> DomainResult<Option<JsonValue>> {
        debug!(sql = %stmt.sql, "dataset query");
        Ok(JsonValue::find_by_statement(stmt).one(self.db.as_ref()).await?)
    }

    /// Run a statement that selects a single `total` column
    pub async fn count(&self, stmt: Statement) -> DomainResult<u64> {
        debug!(sql = %stmt.sql, "dataset count");
        let row = self
            .db
            .query_one(stmt)
            .await?
            .ok_or_else(|| DomainError::Internal("count query returned no row".to_string()))?;
        let total: i64 = row.try_get("", "total")?;
        Ok(total.max(0) as u64)
    }

    /// Count and fetch one page with the same predicates
    pub async fn fetch_page(
        &self,
        filter: &FilterBuilder,
        query: PagedQuery<'_>,
        page: &PageRequest,
    ) -> DomainResult<Page<JsonValue>> {
        let total = self.count(filter.count_statement(query.count)).await?;
        let items = self
            .fetch_all(filter.page_statement(query.select, query.order_by, page))
            .await?;

        Ok(Page {
            items,
            pagination: PaginationMeta::new(total, page),
        })
    }

    /// Trivial probe used by health checks
    pub async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(self.backend(), "SELECT 1"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::infrastructure::database::testing::memory_database;
    use crate::shared::PageLimits;

    const QUERY: PagedQuery<'static> = PagedQuery {
        count: "SELECT COUNT(*) AS total FROM venue",
        select: "SELECT id, name, state FROM venue",
        order_by: "name, id",
    };

    async fn seeded_reader(rows: usize) -> DatasetReader {
        let db = memory_database().await;
        db.execute_unprepared(
            "CREATE TABLE venue (id INTEGER PRIMARY KEY, name TEXT NOT NULL, state TEXT NOT NULL)",
        )
        .await
        .unwrap();
        for i in 0..rows {
            // Duplicate names on purpose: only the id tiebreaker keeps the order total
            let state = if i % 3 == 0 { "OR" } else { "NC" };
            db.execute_unprepared(&format!(
                "INSERT INTO venue (id, name, state) VALUES ({}, 'Park {}', '{}')",
                i + 1,
                i % 4,
                state
            ))
            .await
            .unwrap();
        }
        DatasetReader::new(db)
    }

    #[tokio::test]
    async fn pages_cover_every_row_exactly_once() {
        let reader = seeded_reader(23).await;
        let filter = reader.filter();
        let limits = PageLimits {
            default_page_size: 5,
            max_page_size: 10,
        };

        let first = reader
            .fetch_page(&filter, QUERY, &PageRequest::new(None, None, limits).unwrap())
            .await
            .unwrap();
        assert_eq!(first.pagination.total, 23);
        assert_eq!(first.pagination.total_pages, 5);

        let mut seen = Vec::new();
        for page in 1..=first.pagination.total_pages {
            let request = PageRequest::new(Some(page), None, limits).unwrap();
            let result = reader.fetch_page(&filter, QUERY, &request).await.unwrap();
            assert!(result.items.len() as u64 <= request.page_size);
            seen.extend(result.items.iter().map(|row| row["id"].as_i64().unwrap()));
        }

        let unique: HashSet<i64> = seen.iter().copied().collect();
        assert_eq!(seen.len(), 23);
        assert_eq!(unique.len(), 23);
    }

    #[tokio::test]
    async fn filters_apply_to_count_and_page() {
        let reader = seeded_reader(12).await;
        let mut filter = reader.filter();
        filter.eq("state", Some("OR")).ilike("name", Some("park"));

        let page = reader
            .fetch_page(&filter, QUERY, &PageRequest { page: 1, page_size: 2 })
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 4);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|row| row["state"] == "OR"));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let reader = seeded_reader(3).await;
        let page = reader
            .fetch_page(&reader.filter(), QUERY, &PageRequest { page: 9, page_size: 5 })
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 3);
    }

    #[tokio::test]
    async fn ping_succeeds_on_live_connection() {
        let reader = seeded_reader(0).await;
        assert!(reader.ping().await.is_ok());
    }
}
