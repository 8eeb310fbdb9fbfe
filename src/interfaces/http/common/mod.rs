pub mod error;
pub mod extract;
pub mod params;
pub mod state;
pub mod validated_json;

pub use error::{ApiResult, ErrorBody};
pub use extract::{ApiPath, ApiQuery};
pub use params::{id_text, LeaderboardParams, SeasonPageParams, SeasonParams};
pub use state::ResourceState;
pub use validated_json::{validate, ValidatedJson};

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for driving resource routers over a mocked database

    use std::collections::BTreeMap;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
    use tower::Service;

    use super::ResourceState;
    use crate::config::{DatasetConfig, PaginationConfig};
    use crate::infrastructure::database::DatasetReader;

    pub type Row = BTreeMap<&'static str, Value>;

    pub fn row<const N: usize>(fields: [(&'static str, Value); N]) -> Row {
        fields.into_iter().collect()
    }

    pub fn total(n: i64) -> Vec<Row> {
        vec![row([("total", Value::BigInt(Some(n)))])]
    }

    /// `DatabaseConnection` is not `Clone` while sea-orm's `mock` feature is
    /// on; this shares the underlying handle the same way the derive would
    pub trait ShareConnection {
        fn clone(&self) -> Self;
    }

    impl ShareConnection for DatabaseConnection {
        fn clone(&self) -> Self {
            match self {
                DatabaseConnection::SqlxPostgresPoolConnection(c) => {
                    DatabaseConnection::SqlxPostgresPoolConnection(c.clone())
                }
                DatabaseConnection::SqlxSqlitePoolConnection(c) => {
                    DatabaseConnection::SqlxSqlitePoolConnection(c.clone())
                }
                DatabaseConnection::MockDatabaseConnection(c) => {
                    DatabaseConnection::MockDatabaseConnection(c.clone())
                }
                DatabaseConnection::Disconnected => DatabaseConnection::Disconnected,
            }
        }
    }

    /// A Postgres mock answering queries with `results`, in order
    pub fn mock_db(results: Vec<Vec<Row>>) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection()
    }

    pub fn resource_state(db: DatabaseConnection) -> ResourceState {
        ResourceState {
            reader: DatasetReader::new(db),
            pagination: PaginationConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }

    pub async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router.into_service().call(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Every logged statement, rendered with its values
    pub fn logged_sql(db: DatabaseConnection) -> String {
        format!("{:?}", db.into_transaction_log())
    }
}
