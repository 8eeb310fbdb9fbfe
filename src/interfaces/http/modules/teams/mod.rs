pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::common::ResourceState;

pub use dto::*;
pub use handlers::*;

/// Routes mounted under `/api/v1/teams`
pub fn routes() -> Router<ResourceState> {
    Router::new()
        .route("/", get(list_teams))
        .route("/{team_id}", get(get_team))
        .route("/{team_id}/players", get(team_players))
        .route("/{team_id}/matches", get(team_matches))
        .route("/{team_id}/stats", get(team_stats))
}
