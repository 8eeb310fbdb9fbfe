use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VenueListQuery {
    /// Substring of the venue name or city
    pub search: Option<String>,
    /// Exact state code, e.g. `OR`
    pub state: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
