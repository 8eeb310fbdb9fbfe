use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlayerListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Substring of the player's name
    pub search: Option<String>,
    pub position: Option<String>,
    pub nationality: Option<String>,
}
