//! Query parameters shared by several resources

use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeasonParams {
    /// Season year, e.g. 2024
    pub season: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeasonPageParams {
    pub season: Option<i32>,
    /// 1-based page number
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    pub season: Option<i32>,
    /// Rows to return, 1..=100 (default 10)
    pub limit: Option<i64>,
}

/// Render a row's `id` as text for binding against `::text` comparisons
pub fn id_text(row: &serde_json::Value) -> String {
    match &row["id"] {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
