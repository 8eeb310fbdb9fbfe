pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::common::ResourceState;

pub use dto::*;
pub use handlers::*;

/// Routes mounted under `/api/v1/venues`
pub fn routes() -> Router<ResourceState> {
    Router::new()
        .route("/", get(list_venues))
        .route("/{venue_id}", get(get_venue))
        .route("/{venue_id}/matches", get(venue_matches))
        .route("/{venue_id}/stats", get(venue_stats))
}
