pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::common::ResourceState;

pub use dto::*;
pub use handlers::*;

/// Routes mounted under `/api/v1/matches`
pub fn routes() -> Router<ResourceState> {
    Router::new()
        .route("/", get(list_matches))
        .route("/{match_id}", get(get_match))
        .route("/{match_id}/lineups", get(match_lineups))
        .route("/{match_id}/events", get(match_events))
        .route("/{match_id}/stats", get(match_stats))
}
