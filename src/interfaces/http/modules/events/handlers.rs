use axum::{extract::State, Json};
use sea_orm::JsonValue;
use serde_json::json;

use super::dto::{CardQuery, EventListQuery, GoalQuery};
use crate::infrastructure::database::dataset::PagedQuery;
use crate::interfaces::http::common::{ApiQuery, ApiResult, ErrorBody, ResourceState};

const PLAYER_COLUMNS: [&str; 5] = [
    "me.goal_player_id::text",
    "me.assist_player_id::text",
    "me.card_player_id::text",
    "me.substitution_in_player_id::text",
    "me.substitution_out_player_id::text",
];

const LIST: PagedQuery<'static> = PagedQuery {
    count: "SELECT COUNT(*) AS total FROM match_event me",
    select: "SELECT me.*, t.team_name, \
                    gp.player_name AS goal_player, ap.player_name AS assist_player, \
                    cp.player_name AS card_player, \
                    sip.player_name AS substitution_in_player, \
                    sop.player_name AS substitution_out_player \
             FROM match_event me \
             LEFT JOIN team t ON me.team_uuid = t.id \
             LEFT JOIN player gp ON me.goal_player_id = gp.id \
             LEFT JOIN player ap ON me.assist_player_id = ap.id \
             LEFT JOIN player cp ON me.card_player_id = cp.id \
             LEFT JOIN player sip ON me.substitution_in_player_id = sip.id \
             LEFT JOIN player sop ON me.substitution_out_player_id = sop.id",
    order_by: "me.match_date DESC, me.minute, me.id",
};

/// List match events
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    params(EventListQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{events, pagination}`", body = Object),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list_events(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<EventListQuery>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.list_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    filter
        .eq("me.type", query.event_type)
        .eq("me.season_id", query.season)
        .eq("me.team_uuid::text", query.team_id)
        .eq_any(&PLAYER_COLUMNS, query.player_id);

    let events = state.reader.fetch_page(&filter, LIST, &page).await?;
    Ok(Json(events.into_envelope("events")))
}

/// Goals with scorer and assister names
#[utoipa::path(
    get,
    path = "/api/v1/events/goals",
    tag = "Events",
    params(GoalQuery),
    security(("api_key" = [])),
    responses((status = 200, description = "`{goals, total}`", body = Object))
)]
pub async fn list_goals(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<GoalQuery>,
) -> ApiResult<Json<JsonValue>> {
    let mut filter = state.reader.filter();
    filter
        .fixed("me.type = 'goal'")
        .eq("me.season_id", query.season)
        .eq("me.goal_player_id::text", query.player_id)
        .eq("me.team_uuid::text", query.team_id);

    let sql = format!(
        "SELECT me.id, me.match_date, me.minute, me.score_home, me.score_away, \
                p.player_name AS scorer, ap.player_name AS assist_by, \
                t.team_name, me.detail \
         FROM match_event me \
         LEFT JOIN player p ON me.goal_player_id = p.id \
         LEFT JOIN player ap ON me.assist_player_id = ap.id \
         LEFT JOIN team t ON me.team_uuid = t.id \
         WHERE {} \
         ORDER BY me.match_date DESC, me.minute, me.id",
        filter.where_clause()
    );
    let goals = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "total": goals.len(),
        "goals": goals,
    })))
}

/// Yellow and red cards
#[utoipa::path(
    get,
    path = "/api/v1/events/cards",
    tag = "Events",
    params(CardQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{cards, total}`", body = Object),
        (status = 422, description = "`card_type` is not yellow or red", body = ErrorBody)
    )
)]
pub async fn list_cards(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<CardQuery>,
) -> ApiResult<Json<JsonValue>> {
    let mut filter = state.reader.filter();
    match query.card_type {
        Some(card) => filter.eq("me.type", Some(card.event_type())),
        None => filter.fixed("me.type IN ('yellow_card', 'red_card')"),
    };
    filter
        .eq("me.season_id", query.season)
        .eq("me.card_player_id::text", query.player_id);

    let sql = format!(
        "SELECT me.id, me.match_date, me.minute, me.type, \
                p.player_name, t.team_name, me.detail \
         FROM match_event me \
         LEFT JOIN player p ON me.card_player_id = p.id \
         LEFT JOIN team t ON me.team_uuid = t.id \
         WHERE {} \
         ORDER BY me.match_date DESC, me.minute, me.id",
        filter.where_clause()
    );
    let cards = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "total": cards.len(),
        "cards": cards,
    })))
}
