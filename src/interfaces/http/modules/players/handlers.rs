use axum::{extract::State, Json};
use sea_orm::JsonValue;
use serde_json::json;

use super::dto::PlayerListQuery;
use crate::domain::DomainError;
use crate::infrastructure::database::dataset::PagedQuery;
use crate::interfaces::http::common::{
    ApiPath, ApiQuery, ApiResult, ErrorBody, ResourceState, SeasonPageParams, SeasonParams,
};

const PLAYER_COLUMNS: &str =
    "id, player_name, position, nationality, birth_date, height_cm, nwsl_id, created_at";

/// List players
#[utoipa::path(
    get,
    path = "/api/v1/players",
    tag = "Players",
    params(PlayerListQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{players, pagination}`", body = Object),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list_players(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<PlayerListQuery>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.list_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    filter
        .ilike("player_name", query.search.as_deref())
        .ilike("position", query.position.as_deref())
        .ilike("nationality", query.nationality.as_deref());

    let select = format!("SELECT {} FROM player", PLAYER_COLUMNS);
    let paged = PagedQuery {
        count: "SELECT COUNT(*) AS total FROM player",
        select: &select,
        order_by: "player_name, id",
    };

    let players = state.reader.fetch_page(&filter, paged, &page).await?;
    Ok(Json(players.into_envelope("players")))
}

#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}",
    tag = "Players",
    params(("player_id" = String, Path, description = "Player id")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Player", body = Object),
        (status = 404, description = "Player not found", body = ErrorBody)
    )
)]
pub async fn get_player(
    State(state): State<ResourceState>,
    ApiPath(player_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let mut filter = state.reader.filter();
    let id = filter.bind(player_id);
    let sql = format!(
        "SELECT {} FROM player WHERE id::text = {} LIMIT 1",
        PLAYER_COLUMNS, id
    );

    state
        .reader
        .fetch_optional(filter.statement(sql))
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::not_found("Player not found"))
}

/// Matches the player appeared in, newest first
#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}/matches",
    tag = "Players",
    params(("player_id" = String, Path, description = "Player id"), SeasonPageParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{player_id, matches, pagination}`", body = Object),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn player_matches(
    State(state): State<ResourceState>,
    ApiPath(player_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SeasonPageParams>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.nested_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    filter
        .eq("ml.player_id::text", Some(player_id.as_str()))
        .eq("ml.season_id", query.season);

    let paged = PagedQuery {
        count: "SELECT COUNT(DISTINCT ml.match_id) AS total FROM match_lineup ml",
        select: "SELECT DISTINCT mr.id, mr.fbref_match_id, mr.match_date, mr.season_id, \
                        ml.position, ml.minutes_played, ml.started, ml.subbed_on, ml.subbed_off, \
                        t.team_name, mr.home_teams_id, mr.away_teams_id, \
                        ht.team_name AS home_team_name, at.team_name AS away_team_name, \
                        mr.home_goals, mr.away_goals \
                 FROM match_lineup ml \
                 JOIN match_registry mr ON ml.match_uuid = mr.id \
                 JOIN team t ON ml.team_id = t.id \
                 LEFT JOIN team ht ON mr.home_teams_id = ht.id \
                 LEFT JOIN team at ON mr.away_teams_id = at.id",
        order_by: "mr.match_date DESC, mr.id",
    };

    let matches = state.reader.fetch_page(&filter, paged, &page).await?;
    let mut body = matches.into_envelope("matches");
    body["player_id"] = json!(player_id);
    Ok(Json(body))
}

/// Appearance, shooting and passing aggregates
#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}/stats",
    tag = "Players",
    params(("player_id" = String, Path, description = "Player id"), SeasonParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{player_id, season, matches, shooting, passing}`", body = Object)
    )
)]
pub async fn player_stats(
    State(state): State<ResourceState>,
    ApiPath(player_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SeasonParams>,
) -> ApiResult<Json<JsonValue>> {
    let reader = &state.reader;

    let mut lineup = reader.filter();
    lineup
        .eq("ml.player_id::text", Some(player_id.as_str()))
        .eq("ml.season_id", query.season);

    let mut shots = reader.filter();
    shots
        .eq("player_id::text", Some(player_id.as_str()))
        .eq("season_id", query.season);

    let matches = reader
        .fetch_optional(lineup.statement(format!(
            "SELECT COUNT(DISTINCT ml.match_id) AS matches_played, \
                    COUNT(DISTINCT CASE WHEN ml.started THEN ml.match_id END) AS matches_started, \
                    SUM(ml.minutes_played)::bigint AS total_minutes, \
                    COUNT(DISTINCT ml.season_id) AS seasons_played \
             FROM match_lineup ml \
             WHERE {}",
            lineup.where_clause()
        )))
        .await?;

    let shooting = reader
        .fetch_optional(shots.statement(format!(
            "SELECT COUNT(*) AS total_shots, \
                    COUNT(CASE WHEN outcome = 'Goal' THEN 1 END) AS goals, \
                    COUNT(CASE WHEN outcome = 'Saved' THEN 1 END) AS shots_on_target, \
                    ROUND(AVG(xg)::numeric, 3)::float8 AS avg_xg, \
                    ROUND(SUM(xg)::numeric, 2)::float8 AS total_xg \
             FROM match_shot \
             WHERE {}",
            shots.where_clause()
        )))
        .await?;

    let passing = reader
        .fetch_optional(lineup.statement(format!(
            "SELECT ROUND(AVG(mpp.passes_cmp)::numeric, 1)::float8 AS avg_passes_completed, \
                    ROUND(AVG(mpp.passes_att)::numeric, 1)::float8 AS avg_passes_attempted, \
                    ROUND(AVG(mpp.passes_cmp_pct)::numeric, 1)::float8 AS avg_pass_completion_pct, \
                    SUM(mpp.assists)::bigint AS total_assists, \
                    SUM(mpp.key_passes)::bigint AS total_key_passes \
             FROM match_player_passing mpp \
             JOIN match_lineup ml ON mpp.match_lineup_id = ml.id \
             WHERE {}",
            lineup.where_clause()
        )))
        .await?;

    let season = query.season.map_or_else(|| json!("all"), |s| json!(s));
    Ok(Json(json!({
        "player_id": player_id,
        "season": season,
        "matches": matches,
        "shooting": shooting,
        "passing": passing,
    })))
}

/// Teams the player has appeared for, by season
#[utoipa::path(
    get,
    path = "/api/v1/players/{player_id}/teams",
    tag = "Players",
    params(("player_id" = String, Path, description = "Player id")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{player_id, teams}`", body = Object),
        (status = 404, description = "No team history", body = ErrorBody)
    )
)]
pub async fn player_teams(
    State(state): State<ResourceState>,
    ApiPath(player_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let mut filter = state.reader.filter();
    filter.eq("ml.player_id::text", Some(player_id.as_str()));

    let sql = format!(
        "SELECT t.id, t.team_name, ml.season_id, \
                COUNT(DISTINCT ml.match_id) AS matches_played \
         FROM match_lineup ml \
         JOIN team t ON ml.team_id = t.id \
         WHERE {} \
         GROUP BY t.id, t.team_name, ml.season_id \
         ORDER BY ml.season_id DESC, t.team_name, t.id",
        filter.where_clause()
    );
    let teams = state.reader.fetch_all(filter.statement(sql)).await?;

    if teams.is_empty() {
        return Err(DomainError::not_found("No team history found for this player"));
    }

    Ok(Json(json!({
        "player_id": player_id,
        "teams": teams,
    })))
}

#[cfg(test)]
mod tests {
    use sea_orm::Value;

    use super::super::routes;
    use crate::interfaces::http::common::testing::*;

    #[tokio::test]
    async fn list_filters_are_all_substring_matches() {
        let db = mock_db(vec![total(0), vec![]]);
        let router = routes().with_state(resource_state(db.clone()));

        let (status, body) = get(router, "/?position=FW&nationality=usa").await;

        assert_eq!(status, 200);
        assert_eq!(body["players"], serde_json::json!([]));
        assert_eq!(body["pagination"]["total_pages"], 0);

        let sql = logged_sql(db);
        assert!(sql.contains("position ILIKE $1 ESCAPE"));
        assert!(sql.contains("AND nationality ILIKE $2 ESCAPE"));
        assert!(sql.contains("%FW%"));
        assert!(sql.contains("%usa%"));
    }

    #[tokio::test]
    async fn match_history_uses_nested_page_limits() {
        let router = routes().with_state(resource_state(mock_db(vec![])));

        let (status, body) = get(router, "/p1/matches?page_size=500").await;

        assert_eq!(status, 422);
        assert_eq!(body["detail"], "page_size must be between 1 and 200");
    }

    #[tokio::test]
    async fn match_history_echoes_player_id() {
        let db = mock_db(vec![
            total(1),
            vec![row([("id", Value::from("m1")), ("minutes_played", Value::from(90))])],
        ]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/p1/matches").await;

        assert_eq!(status, 200);
        assert_eq!(body["player_id"], "p1");
        assert_eq!(body["matches"][0]["minutes_played"], 90);
        assert_eq!(body["pagination"]["page_size"], 50);
    }

    #[tokio::test]
    async fn stats_report_all_seasons_when_unfiltered() {
        let db = mock_db(vec![
            vec![row([("matches_played", Value::BigInt(Some(12)))])],
            vec![row([("goals", Value::BigInt(Some(4)))])],
            vec![row([("total_assists", Value::BigInt(Some(2)))])],
        ]);
        let router = routes().with_state(resource_state(db));

        let (status, body) = get(router, "/p1/stats").await;

        assert_eq!(status, 200);
        assert_eq!(body["season"], "all");
        assert_eq!(body["matches"]["matches_played"], 12);
        assert_eq!(body["shooting"]["goals"], 4);
        assert_eq!(body["passing"]["total_assists"], 2);
    }

    #[tokio::test]
    async fn empty_team_history_is_404() {
        let router = routes().with_state(resource_state(mock_db(vec![vec![]])));

        let (status, body) = get(router, "/p1/teams").await;

        assert_eq!(status, 404);
        assert_eq!(body["detail"], "No team history found for this player");
    }

    #[tokio::test]
    async fn unknown_player_is_404() {
        let router = routes().with_state(resource_state(mock_db(vec![vec![]])));

        let (status, _) = get(router, "/nobody").await;
        assert_eq!(status, 404);
    }
}
