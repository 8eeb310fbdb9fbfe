pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::common::ResourceState;

pub use handlers::*;

/// Routes mounted under `/api/v1/stats`
pub fn routes() -> Router<ResourceState> {
    Router::new()
        .route("/leaderboard/goals", get(goal_leaders))
        .route("/leaderboard/assists", get(assist_leaders))
        .route("/leaderboard/clean-sheets", get(clean_sheet_leaders))
        .route("/team/{team_id}/season/{season}", get(team_season))
        .route("/player/{player_id}/career", get(player_career))
}
