pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::common::ResourceState;

pub use dto::*;
pub use handlers::*;

/// Routes mounted under `/api/v1/events`
pub fn routes() -> Router<ResourceState> {
    Router::new()
        .route("/", get(list_events))
        .route("/goals", get(list_goals))
        .route("/cards", get(list_cards))
}
