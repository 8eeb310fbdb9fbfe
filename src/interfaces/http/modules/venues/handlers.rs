use axum::{extract::State, Json};
use sea_orm::JsonValue;
use serde_json::json;

use super::dto::VenueListQuery;
use crate::domain::DomainError;
use crate::infrastructure::database::dataset::PagedQuery;
use crate::interfaces::http::common::{
    id_text, ApiPath, ApiQuery, ApiResult, ErrorBody, ResourceState, SeasonPageParams,
};

const LIST: PagedQuery<'static> = PagedQuery {
    count: "SELECT COUNT(*) AS total FROM venue",
    select: "SELECT id, name, city, state, capacity, surface, opened_year, latitude, longitude \
             FROM venue",
    order_by: "name, id",
};

/// List venues
#[utoipa::path(
    get,
    path = "/api/v1/venues",
    tag = "Venues",
    params(VenueListQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{venues, pagination}`", body = Object),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list_venues(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<VenueListQuery>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.list_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    filter
        .ilike_any(&["name", "city"], query.search.as_deref())
        .eq("state", query.state);

    let venues = state.reader.fetch_page(&filter, LIST, &page).await?;
    Ok(Json(venues.into_envelope("venues")))
}

async fn find_venue(state: &ResourceState, venue_id: String, columns: &str) -> ApiResult<JsonValue> {
    let mut filter = state.reader.filter();
    let id = filter.bind(venue_id);
    let sql = format!("SELECT {} FROM venue WHERE id::text = {} LIMIT 1", columns, id);
    state
        .reader
        .fetch_optional(filter.statement(sql))
        .await?
        .ok_or_else(|| DomainError::not_found("Venue not found"))
}

#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue id")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Venue", body = Object),
        (status = 404, description = "Venue not found", body = ErrorBody)
    )
)]
pub async fn get_venue(
    State(state): State<ResourceState>,
    ApiPath(venue_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    find_venue(&state, venue_id, "*").await.map(Json)
}

/// Matches played at the venue, newest first
#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/matches",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue id"), SeasonPageParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{venue, matches, pagination}`", body = Object),
        (status = 404, description = "Venue not found", body = ErrorBody),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn venue_matches(
    State(state): State<ResourceState>,
    ApiPath(venue_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SeasonPageParams>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.nested_page(query.page, query.page_size)?;
    let venue = find_venue(&state, venue_id, "id, name").await?;

    let mut filter = state.reader.filter();
    filter
        .eq("mr.venue_id::text", Some(id_text(&venue)))
        .eq("mr.season_id", query.season);

    let paged = PagedQuery {
        count: "SELECT COUNT(*) AS total FROM match_registry mr",
        select: "SELECT mr.id, mr.fbref_match_id, mr.match_date, mr.season_id, \
                        mr.home_goals, mr.away_goals, \
                        ht.team_name AS home_team, at.team_name AS away_team, \
                        mr.attendance, mr.type \
                 FROM match_registry mr \
                 JOIN team ht ON mr.home_teams_id = ht.id \
                 JOIN team at ON mr.away_teams_id = at.id",
        order_by: "mr.match_date DESC, mr.id",
    };

    let matches = state.reader.fetch_page(&filter, paged, &page).await?;
    let mut body = matches.into_envelope("matches");
    body["venue"] = venue;
    Ok(Json(body))
}

/// Attendance, scoring and home-advantage figures for the venue
#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/stats",
    tag = "Venues",
    params(("venue_id" = String, Path, description = "Venue id")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{venue, statistics, home_advantage}`", body = Object),
        (status = 404, description = "Venue not found", body = ErrorBody)
    )
)]
pub async fn venue_stats(
    State(state): State<ResourceState>,
    ApiPath(venue_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let venue = find_venue(&state, venue_id, "id, name, city, state").await?;

    let mut filter = state.reader.filter();
    filter.eq("venue_id::text", Some(id_text(&venue)));

    let statistics = state
        .reader
        .fetch_optional(filter.statement(format!(
            "SELECT COUNT(*) AS total_matches, \
                    ROUND(AVG(attendance)::numeric, 0)::float8 AS avg_attendance, \
                    MAX(attendance) AS max_attendance, \
                    MIN(attendance) AS min_attendance, \
                    ROUND(AVG(home_goals + away_goals)::numeric, 2)::float8 AS avg_goals_per_match, \
                    COUNT(DISTINCT season_id) AS seasons, \
                    MIN(match_date) AS first_match, \
                    MAX(match_date) AS last_match \
             FROM match_registry \
             WHERE {}",
            filter.where_clause()
        )))
        .await?;

    let home_advantage = state
        .reader
        .fetch_optional(filter.statement(format!(
            "SELECT COUNT(CASE WHEN home_goals > away_goals THEN 1 END) AS home_wins, \
                    COUNT(CASE WHEN home_goals = away_goals THEN 1 END) AS draws, \
                    COUNT(CASE WHEN home_goals < away_goals THEN 1 END) AS away_wins, \
                    ROUND(AVG(home_goals)::numeric, 2)::float8 AS avg_home_goals, \
                    ROUND(AVG(away_goals)::numeric, 2)::float8 AS avg_away_goals \
             FROM match_registry \
             WHERE {}",
            filter.where_clause()
        )))
        .await?;

    Ok(Json(json!({
        "venue": venue,
        "statistics": statistics,
        "home_advantage": home_advantage,
    })))
}

#[cfg(test)]
mod tests {
    use sea_orm::Value;

    use super::super::routes;
    use crate::interfaces::http::common::testing::*;

    #[tokio::test]
    async fn list_is_paginated_and_filtered() {
        let db = mock_db(vec![
            total(1),
            vec![row([("id", Value::from(4)), ("name", Value::from("Providence Park"))])],
        ]);
        let router = routes().with_state(resource_state(db.clone()));

        let (status, body) = get(router, "/?search=portland&state=OR").await;

        assert_eq!(status, 200);
        assert_eq!(body["venues"][0]["name"], "Providence Park");
        assert_eq!(body["pagination"]["total"], 1);

        let sql = logged_sql(db);
        assert!(sql.contains("(name ILIKE $1 ESCAPE"));
        assert!(sql.contains("OR city ILIKE $1 ESCAPE"));
        assert!(sql.contains(") AND state = $2"));
        assert!(sql.contains("%portland%"));
    }

    #[tokio::test]
    async fn matches_for_unknown_venue_is_404() {
        let db = mock_db(vec![vec![]]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/99/matches").await;

        assert_eq!(status, 404);
        assert_eq!(body["detail"], "Venue not found");
    }

    #[tokio::test]
    async fn matches_embed_the_venue() {
        let db = mock_db(vec![
            vec![row([("id", Value::from(4)), ("name", Value::from("Providence Park"))])],
            total(0),
            vec![],
        ]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/4/matches?season=2024").await;

        assert_eq!(status, 200);
        assert_eq!(body["venue"]["name"], "Providence Park");
        assert_eq!(body["matches"], serde_json::json!([]));
        assert_eq!(body["pagination"]["page_size"], 50);
    }

    #[tokio::test]
    async fn stats_combine_both_aggregates() {
        let db = mock_db(vec![
            vec![row([("id", Value::from(4)), ("name", Value::from("Providence Park"))])],
            vec![row([("total_matches", Value::BigInt(Some(30)))])],
            vec![row([("home_wins", Value::BigInt(Some(17)))])],
        ]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/4/stats").await;

        assert_eq!(status, 200);
        assert_eq!(body["venue"]["id"], 4);
        assert_eq!(body["statistics"]["total_matches"], 30);
        assert_eq!(body["home_advantage"]["home_wins"], 17);
    }
}
