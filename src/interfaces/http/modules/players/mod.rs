pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::common::ResourceState;

pub use dto::*;
pub use handlers::*;

/// Routes mounted under `/api/v1/players`
pub fn routes() -> Router<ResourceState> {
    Router::new()
        .route("/", get(list_players))
        .route("/{player_id}", get(get_player))
        .route("/{player_id}/matches", get(player_matches))
        .route("/{player_id}/stats", get(player_stats))
        .route("/{player_id}/teams", get(player_teams))
}
