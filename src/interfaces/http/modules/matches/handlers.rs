//! Match handlers
//!
//! Sub-resources first resolve the match by `id` or `fbref_match_id`, then
//! query child tables by the resolved `id`.

use axum::{extract::State, Json};
use sea_orm::JsonValue;
use serde_json::json;

use super::dto::MatchListQuery;
use crate::domain::DomainError;
use crate::infrastructure::database::dataset::PagedQuery;
use crate::interfaces::http::common::{
    id_text, ApiPath, ApiQuery, ApiResult, ErrorBody, ResourceState,
};

const LIST: PagedQuery<'static> = PagedQuery {
    count: "SELECT COUNT(*) AS total FROM match_registry mr",
    select: "SELECT mr.id, mr.fbref_match_id, mr.match_date, mr.season_id, \
                    mr.home_goals, mr.away_goals, \
                    ht.id AS home_team_id, ht.team_name AS home_team_name, \
                    at.id AS away_team_id, at.team_name AS away_team_name, \
                    v.name AS venue_name, v.city AS venue_city, \
                    mr.attendance, mr.type, mr.round \
             FROM match_registry mr \
             LEFT JOIN team ht ON mr.home_teams_id = ht.id \
             LEFT JOIN team at ON mr.away_teams_id = at.id \
             LEFT JOIN venue v ON mr.venue_id = v.id",
    order_by: "mr.match_date DESC, mr.time DESC, mr.id",
};

/// List matches, newest first
#[utoipa::path(
    get,
    path = "/api/v1/matches",
    tag = "Matches",
    params(MatchListQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{matches, pagination}`", body = Object),
        (status = 422, description = "Invalid filter or paging parameters", body = ErrorBody)
    )
)]
pub async fn list_matches(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<MatchListQuery>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.list_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    filter
        .eq("mr.season_id", query.season)
        .eq_any(
            &["mr.home_teams_id::text", "mr.away_teams_id::text"],
            query.team_id,
        )
        .gte("mr.match_date", query.start_date)
        .lte("mr.match_date", query.end_date);

    let matches = state.reader.fetch_page(&filter, LIST, &page).await?;
    Ok(Json(matches.into_envelope("matches")))
}

async fn find_match(state: &ResourceState, match_id: String, sql: &str) -> ApiResult<JsonValue> {
    let mut filter = state.reader.filter();
    let id = filter.bind(match_id);
    let sql = format!(
        "{} WHERE mr.id::text = {} OR mr.fbref_match_id = {} LIMIT 1",
        sql, id, id
    );
    state
        .reader
        .fetch_optional(filter.statement(sql))
        .await?
        .ok_or_else(|| DomainError::not_found("Match not found"))
}

#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}",
    tag = "Matches",
    params(("match_id" = String, Path, description = "Match `id` or `fbref_match_id`")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Match with team and venue names", body = Object),
        (status = 404, description = "Match not found", body = ErrorBody)
    )
)]
pub async fn get_match(
    State(state): State<ResourceState>,
    ApiPath(match_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let found = find_match(
        &state,
        match_id,
        "SELECT mr.*, ht.team_name AS home_team_name, at.team_name AS away_team_name, \
                v.name AS venue_name, v.city AS venue_city, v.state AS venue_state \
         FROM match_registry mr \
         LEFT JOIN team ht ON mr.home_teams_id = ht.id \
         LEFT JOIN team at ON mr.away_teams_id = at.id \
         LEFT JOIN venue v ON mr.venue_id = v.id",
    )
    .await?;
    Ok(Json(found))
}

/// Both lineups, split by the match's home and away team
#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}/lineups",
    tag = "Matches",
    params(("match_id" = String, Path, description = "Match `id` or `fbref_match_id`")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{match_id, match_date, home_lineup, away_lineup}`", body = Object),
        (status = 404, description = "Match not found", body = ErrorBody)
    )
)]
pub async fn match_lineups(
    State(state): State<ResourceState>,
    ApiPath(match_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let found = find_match(
        &state,
        match_id,
        "SELECT mr.id, mr.home_teams_id, mr.away_teams_id, mr.match_date FROM match_registry mr",
    )
    .await?;

    let mut filter = state.reader.filter();
    let id = filter.bind(id_text(&found));
    let sql = format!(
        "SELECT ml.id, ml.player_id, p.player_name, ml.position, ml.shirt_number, \
                ml.minutes_played, ml.started, ml.subbed_on, ml.subbed_off, \
                ml.team_id, t.team_name \
         FROM match_lineup ml \
         JOIN player p ON ml.player_id = p.id \
         JOIN team t ON ml.team_id = t.id \
         WHERE ml.match_uuid::text = {} \
         ORDER BY t.team_name, ml.started DESC, ml.shirt_number, ml.id",
        id
    );
    let lineups = state.reader.fetch_all(filter.statement(sql)).await?;

    let (home, rest): (Vec<_>, Vec<_>) = lineups
        .into_iter()
        .partition(|player| player["team_id"] == found["home_teams_id"]);
    let away: Vec<_> = rest
        .into_iter()
        .filter(|player| player["team_id"] == found["away_teams_id"])
        .collect();

    Ok(Json(json!({
        "match_id": found["id"],
        "match_date": found["match_date"],
        "home_lineup": home,
        "away_lineup": away,
    })))
}

/// Goals, cards and substitutions in match order
#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}/events",
    tag = "Matches",
    params(("match_id" = String, Path, description = "Match `id` or `fbref_match_id`")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{match_id, events, total_events}`", body = Object),
        (status = 404, description = "Match not found", body = ErrorBody)
    )
)]
pub async fn match_events(
    State(state): State<ResourceState>,
    ApiPath(match_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let found = find_match(&state, match_id, "SELECT mr.id FROM match_registry mr").await?;

    let mut filter = state.reader.filter();
    let id = filter.bind(id_text(&found));
    let sql = format!(
        "SELECT me.id, me.minute, me.stoppage_time, me.type, me.detail, \
                me.score_home, me.score_away, t.team_name, \
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
         LEFT JOIN player sop ON me.substitution_out_player_id = sop.id \
         WHERE me.match_uuid::text = {} \
         ORDER BY me.minute, me.stoppage_time, me.id",
        id
    );
    let events = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "match_id": found["id"],
        "total_events": events.len(),
        "events": events,
    })))
}

/// Per-team summaries for the match
#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}/stats",
    tag = "Matches",
    params(("match_id" = String, Path, description = "Match `id` or `fbref_match_id`")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{match_id, home_stats, away_stats}`", body = Object),
        (status = 404, description = "Match or statistics not found", body = ErrorBody)
    )
)]
pub async fn match_stats(
    State(state): State<ResourceState>,
    ApiPath(match_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let found = find_match(&state, match_id, "SELECT mr.id FROM match_registry mr").await?;

    let mut filter = state.reader.filter();
    let id = filter.bind(id_text(&found));
    let sql = format!(
        "SELECT mts.*, t.team_name \
         FROM match_team_summary mts \
         JOIN team t ON mts.team_id = t.id \
         WHERE mts.match_uuid::text = {} \
         ORDER BY mts.is_home DESC, mts.team_id",
        id
    );
    let summaries = state.reader.fetch_all(filter.statement(sql)).await?;

    if summaries.is_empty() {
        return Err(DomainError::not_found("No statistics found for this match"));
    }

    let is_home = |row: &JsonValue| row["is_home"].as_bool().unwrap_or(false);
    let home = summaries.iter().find(|row| is_home(row));
    let away = summaries.iter().find(|row| !is_home(row));

    Ok(Json(json!({
        "match_id": found["id"],
        "home_stats": home,
        "away_stats": away,
    })))
}

#[cfg(test)]
mod tests {
    use sea_orm::Value;

    use super::super::routes;
    use crate::interfaces::http::common::testing::*;

    #[tokio::test]
    async fn list_binds_every_filter() {
        let db = mock_db(vec![total(0), vec![]]);
        let router = routes().with_state(resource_state(db.clone()));

        let (status, _) = get(
            router,
            "/?season=2024&team_id=t1&start_date=2024-03-01&end_date=2024-11-30",
        )
        .await;
        assert_eq!(status, 200);

        let sql = logged_sql(db);
        assert!(sql.contains(
            "mr.season_id = $1 AND (mr.home_teams_id::text = $2 OR mr.away_teams_id::text = $2) \
             AND mr.match_date >= $3 AND mr.match_date <= $4"
        ));
        assert!(sql.contains("ORDER BY mr.match_date DESC, mr.time DESC, mr.id LIMIT $5 OFFSET $6"));
    }

    #[tokio::test]
    async fn malformed_date_is_422() {
        let router = routes().with_state(resource_state(mock_db(vec![])));

        let (status, body) = get(router, "/?start_date=yesterday").await;

        assert_eq!(status, 422);
        assert_eq!(body["status_code"], 422);
    }

    #[tokio::test]
    async fn lineups_split_by_home_and_away_team() {
        let db = mock_db(vec![
            vec![row([
                ("id", Value::from("m1")),
                ("home_teams_id", Value::from("home")),
                ("away_teams_id", Value::from("away")),
                ("match_date", Value::from("2024-05-01")),
            ])],
            vec![
                row([("id", Value::from(1)), ("team_id", Value::from("away"))]),
                row([("id", Value::from(2)), ("team_id", Value::from("home"))]),
                row([("id", Value::from(3)), ("team_id", Value::from("home"))]),
            ],
        ]);
        let router = routes().with_state(resource_state(db.clone()));

        let (status, body) = get(router, "/fbref-123/lineups").await;

        assert_eq!(status, 200);
        assert_eq!(body["match_id"], "m1");
        assert_eq!(body["home_lineup"].as_array().unwrap().len(), 2);
        assert_eq!(body["away_lineup"][0]["id"], 1);

        // The lineup query is keyed by the resolved id, not the path value
        let sql = logged_sql(db);
        assert!(sql.contains("fbref-123"));
        assert!(sql.contains("ml.match_uuid::text = $1"));
        assert!(sql.contains("\"m1\""));
    }

    #[tokio::test]
    async fn events_report_their_count() {
        let db = mock_db(vec![
            vec![row([("id", Value::from("m1"))])],
            vec![
                row([("id", Value::from(1)), ("type", Value::from("goal"))]),
                row([("id", Value::from(2)), ("type", Value::from("yellow_card"))]),
            ],
        ]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/m1/events").await;

        assert_eq!(status, 200);
        assert_eq!(body["total_events"], 2);
        assert_eq!(body["events"][1]["type"], "yellow_card");
    }

    #[tokio::test]
    async fn stats_are_split_by_side() {
        let db = mock_db(vec![
            vec![row([("id", Value::from("m1"))])],
            vec![
                row([("is_home", Value::from(true)), ("goals_for", Value::from(2))]),
                row([("is_home", Value::from(false)), ("goals_for", Value::from(1))]),
            ],
        ]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/m1/stats").await;

        assert_eq!(status, 200);
        assert_eq!(body["home_stats"]["goals_for"], 2);
        assert_eq!(body["away_stats"]["goals_for"], 1);
    }

    #[tokio::test]
    async fn stats_without_summaries_is_404() {
        let db = mock_db(vec![vec![row([("id", Value::from("m1"))])], vec![]]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/m1/stats").await;

        assert_eq!(status, 404);
        assert_eq!(body["detail"], "No statistics found for this match");
    }

    #[tokio::test]
    async fn unknown_match_is_404() {
        let router = routes().with_state(resource_state(mock_db(vec![vec![]])));

        let (status, body) = get(router, "/missing/events").await;

        assert_eq!(status, 404);
        assert_eq!(body["detail"], "Match not found");
    }
}
