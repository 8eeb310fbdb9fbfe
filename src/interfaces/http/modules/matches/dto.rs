use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchListQuery {
    pub season: Option<i32>,
    /// Team playing home or away
    pub team_id: Option<String>,
    /// Earliest match date, inclusive (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Latest match date, inclusive (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
