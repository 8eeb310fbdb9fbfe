//! Team handlers

use axum::{extract::State, Json};
use sea_orm::JsonValue;
use serde_json::json;

use super::dto::TeamListQuery;
use crate::domain::DomainError;
use crate::infrastructure::database::dataset::PagedQuery;
use crate::interfaces::http::common::{
    id_text, ApiPath, ApiQuery, ApiResult, ErrorBody, ResourceState, SeasonPageParams,
    SeasonParams,
};

const TEAM_NOT_FOUND: &str = "Team not found";

const LIST: PagedQuery<'static> = PagedQuery {
    count: "SELECT COUNT(*) AS total FROM team",
    select: "SELECT id, team_id, team_name, team_name_long, active_2024, active_2025, created_at \
             FROM team",
    order_by: "team_name, id",
};

/// List teams
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "Teams",
    params(TeamListQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{teams, pagination}`", body = Object),
        (status = 403, description = "Missing or invalid API key", body = ErrorBody),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list_teams(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<TeamListQuery>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.list_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    filter.ilike_any(&["team_name", "team_name_long"], query.search.as_deref());

    let teams = state.reader.fetch_page(&filter, LIST, &page).await?;
    Ok(Json(teams.into_envelope("teams")))
}

/// Look a team up by `id` or by `team_id`
async fn find_team(state: &ResourceState, team_id: String, columns: &str) -> ApiResult<JsonValue> {
    let mut filter = state.reader.filter();
    let id = filter.bind(team_id);
    let sql = format!(
        "SELECT {} FROM team WHERE id::text = {} OR team_id::text = {} LIMIT 1",
        columns, id, id
    );
    state
        .reader
        .fetch_optional(filter.statement(sql))
        .await?
        .ok_or_else(|| DomainError::not_found(TEAM_NOT_FOUND))
}

/// Team detail, with every season's active flag
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}",
    tag = "Teams",
    params(("team_id" = String, Path, description = "Team `id` or `team_id`")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Team", body = Object),
        (status = 404, description = "Team not found", body = ErrorBody)
    )
)]
pub async fn get_team(
    State(state): State<ResourceState>,
    ApiPath(team_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let team = find_team(
        &state,
        team_id,
        "id, team_id, team_name, team_name_long, \
         active_2013, active_2014, active_2015, active_2016, active_2017, \
         active_2018, active_2019, active_2020, active_2021, active_2022, \
         active_2023, active_2024, active_2025, created_at",
    )
    .await?;
    Ok(Json(team))
}

/// Players who appeared in a lineup for the team
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/players",
    tag = "Teams",
    params(("team_id" = String, Path, description = "Team `id` or `team_id`"), SeasonParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{team, players, count}`", body = Object),
        (status = 404, description = "Team not found", body = ErrorBody)
    )
)]
pub async fn team_players(
    State(state): State<ResourceState>,
    ApiPath(team_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SeasonParams>,
) -> ApiResult<Json<JsonValue>> {
    let team = find_team(&state, team_id, "id, team_name").await?;

    let mut filter = state.reader.filter();
    let id = filter.bind(id_text(&team));
    filter
        .fixed(format!("ml.team_id::text = {}", id))
        .eq("ml.season_id", query.season);

    let sql = format!(
        "SELECT DISTINCT p.id, p.player_name, p.position, p.nationality, p.birth_date, \
                ml.season_id AS season \
         FROM match_lineup ml \
         JOIN player p ON ml.player_id = p.id \
         WHERE {} \
         ORDER BY p.player_name, p.id, ml.season_id",
        filter.where_clause()
    );
    let players = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "team": team,
        "count": players.len(),
        "players": players,
    })))
}

/// Matches where the team played home or away, newest first
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/matches",
    tag = "Teams",
    params(("team_id" = String, Path, description = "Team id"), SeasonPageParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{matches, pagination}`; each row carries `team_side` and `result`", body = Object),
        (status = 422, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn team_matches(
    State(state): State<ResourceState>,
    ApiPath(team_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SeasonPageParams>,
) -> ApiResult<Json<JsonValue>> {
    let page = state.list_page(query.page, query.page_size)?;

    let mut filter = state.reader.filter();
    let team = filter.bind(team_id);
    filter
        .fixed(format!(
            "(mr.home_teams_id::text = {t} OR mr.away_teams_id::text = {t})",
            t = team
        ))
        .eq("mr.season_id", query.season);

    let select = format!(
        "SELECT mr.id, mr.fbref_match_id, mr.match_date, mr.season_id, \
                mr.home_goals, mr.away_goals, mr.home_teams_id, mr.away_teams_id, \
                ht.team_name AS home_team_name, at.team_name AS away_team_name, \
                v.name AS venue_name, mr.attendance, mr.type, \
                CASE WHEN mr.home_teams_id::text = {t} THEN 'home' ELSE 'away' END AS team_side, \
                CASE \
                    WHEN mr.home_teams_id::text = {t} AND mr.home_goals > mr.away_goals THEN 'W' \
                    WHEN mr.away_teams_id::text = {t} AND mr.away_goals > mr.home_goals THEN 'W' \
                    WHEN mr.home_goals = mr.away_goals THEN 'D' \
                    ELSE 'L' \
                END AS result \
         FROM match_registry mr \
         LEFT JOIN team ht ON mr.home_teams_id = ht.id \
         LEFT JOIN team at ON mr.away_teams_id = at.id \
         LEFT JOIN venue v ON mr.venue_id = v.id",
        t = team
    );
    let paged = PagedQuery {
        count: "SELECT COUNT(*) AS total FROM match_registry mr",
        select: &select,
        order_by: "mr.match_date DESC, mr.id",
    };

    let matches = state.reader.fetch_page(&filter, paged, &page).await?;
    Ok(Json(matches.into_envelope("matches")))
}

/// Aggregates over the team's per-match summaries
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/stats",
    tag = "Teams",
    params(("team_id" = String, Path, description = "Team id"), SeasonParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Aggregated team statistics", body = Object),
        (status = 404, description = "No matches recorded", body = ErrorBody)
    )
)]
pub async fn team_stats(
    State(state): State<ResourceState>,
    ApiPath(team_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SeasonParams>,
) -> ApiResult<Json<JsonValue>> {
    let mut filter = state.reader.filter();
    let team = filter.bind(team_id);
    filter
        .fixed(format!("team_id::text = {}", team))
        .eq("season_id", query.season);

    let sql = format!(
        "SELECT COUNT(*) AS matches_played, \
                SUM(goals_for)::bigint AS total_goals_for, \
                SUM(goals_against)::bigint AS total_goals_against, \
                SUM(CASE WHEN outcome = 'Win' THEN 1 ELSE 0 END)::bigint AS wins, \
                SUM(CASE WHEN outcome = 'Draw' THEN 1 ELSE 0 END)::bigint AS draws, \
                SUM(CASE WHEN outcome = 'Loss' THEN 1 ELSE 0 END)::bigint AS losses, \
                SUM(points)::bigint AS total_points, \
                ROUND(AVG(total_passes_attempted)::numeric, 2)::float8 AS avg_passes_attempted, \
                ROUND(AVG(pass_completion_pct)::numeric, 2)::float8 AS avg_pass_completion, \
                ROUND(AVG(total_shots)::numeric, 2)::float8 AS avg_shots, \
                ROUND(AVG(shots_on_target)::numeric, 2)::float8 AS avg_shots_on_target, \
                ROUND(AVG(total_xg)::numeric, 2)::float8 AS avg_xg, \
                SUM(yellow_cards)::bigint AS total_yellow_cards, \
                SUM(red_cards)::bigint AS total_red_cards \
         FROM match_team_summary \
         WHERE {}",
        filter.where_clause()
    );

    let stats = state.reader.fetch_optional(filter.statement(sql)).await?;
    match stats {
        Some(stats) if stats["matches_played"].as_i64().unwrap_or(0) > 0 => Ok(Json(stats)),
        _ => Err(DomainError::not_found("No statistics found for this team")),
    }
}
