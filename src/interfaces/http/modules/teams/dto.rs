use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Substring of the short or long team name
    pub search: Option<String>,
}
