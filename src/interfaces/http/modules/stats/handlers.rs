//! Leaderboards and season / career breakdowns

use axum::{extract::State, Json};
use sea_orm::JsonValue;
use serde_json::json;

use crate::domain::{DomainError, DomainResult};
use crate::interfaces::http::common::{
    ApiPath, ApiQuery, ApiResult, ErrorBody, LeaderboardParams, ResourceState,
};

const DEFAULT_LEADERBOARD_SIZE: i64 = 10;
const MAX_LEADERBOARD_SIZE: i64 = 100;
const TOP_SCORERS: i64 = 5;
const MIN_KEEPER_APPEARANCES: i64 = 5;

fn leaderboard_limit(limit: Option<i64>) -> DomainResult<i64> {
    let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE);
    if !(1..=MAX_LEADERBOARD_SIZE).contains(&limit) {
        return Err(DomainError::validation(format!(
            "limit must be between 1 and {}",
            MAX_LEADERBOARD_SIZE
        )));
    }
    Ok(limit)
}

fn season_label(season: Option<i32>) -> JsonValue {
    season.map_or_else(|| json!("all"), |s| json!(s))
}

/// Top scorers; the season defaults to the current one
#[utoipa::path(
    get,
    path = "/api/v1/stats/leaderboard/goals",
    tag = "Statistics",
    params(LeaderboardParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{season, leaderboard}`", body = Object),
        (status = 422, description = "`limit` out of range", body = ErrorBody)
    )
)]
pub async fn goal_leaders(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<LeaderboardParams>,
) -> ApiResult<Json<JsonValue>> {
    let limit = leaderboard_limit(query.limit)?;
    let season = query.season.unwrap_or(state.dataset.current_season);

    let mut filter = state.reader.filter();
    filter
        .fixed("me.type = 'goal'")
        .fixed("me.goal_player_id IS NOT NULL")
        .eq("me.season_id", Some(season));
    let limit = filter.bind(limit);

    let sql = format!(
        "SELECT me.goal_player_id AS player_id, p.player_name, \
                COUNT(*) AS goals, COUNT(DISTINCT me.match_id) AS matches \
         FROM match_event me \
         JOIN player p ON me.goal_player_id = p.id \
         WHERE {} \
         GROUP BY me.goal_player_id, p.player_name \
         ORDER BY goals DESC, me.goal_player_id \
         LIMIT {}",
        filter.where_clause(),
        limit
    );
    let leaderboard = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "season": season,
        "leaderboard": leaderboard,
    })))
}

/// Top assist providers, across all seasons unless one is given
#[utoipa::path(
    get,
    path = "/api/v1/stats/leaderboard/assists",
    tag = "Statistics",
    params(LeaderboardParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{season, leaderboard}`", body = Object),
        (status = 422, description = "`limit` out of range", body = ErrorBody)
    )
)]
pub async fn assist_leaders(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<LeaderboardParams>,
) -> ApiResult<Json<JsonValue>> {
    let limit = leaderboard_limit(query.limit)?;

    let mut filter = state.reader.filter();
    filter
        .fixed("me.assist_player_id IS NOT NULL")
        .eq("me.season_id", query.season);
    let limit = filter.bind(limit);

    let sql = format!(
        "SELECT me.assist_player_id AS player_id, p.player_name, COUNT(*) AS assists \
         FROM match_event me \
         JOIN player p ON me.assist_player_id = p.id \
         WHERE {} \
         GROUP BY me.assist_player_id, p.player_name \
         ORDER BY assists DESC, me.assist_player_id \
         LIMIT {}",
        filter.where_clause(),
        limit
    );
    let leaderboard = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "season": season_label(query.season),
        "leaderboard": leaderboard,
    })))
}

/// Goalkeepers by clean sheets, among those with enough appearances
#[utoipa::path(
    get,
    path = "/api/v1/stats/leaderboard/clean-sheets",
    tag = "Statistics",
    params(LeaderboardParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{season, leaderboard}`", body = Object),
        (status = 422, description = "`limit` out of range", body = ErrorBody)
    )
)]
pub async fn clean_sheet_leaders(
    State(state): State<ResourceState>,
    ApiQuery(query): ApiQuery<LeaderboardParams>,
) -> ApiResult<Json<JsonValue>> {
    let limit = leaderboard_limit(query.limit)?;

    let mut filter = state.reader.filter();
    filter.eq("mg.season_id", query.season);
    let limit = filter.bind(limit);

    let sql = format!(
        "SELECT mg.player_id, p.player_name, \
                COUNT(CASE WHEN mg.goals_against = 0 THEN 1 END) AS clean_sheets, \
                COUNT(*) AS matches_played, \
                SUM(mg.saves)::bigint AS total_saves, \
                ROUND(AVG(mg.save_pct)::numeric, 1)::float8 AS avg_save_pct \
         FROM match_goalkeeper mg \
         JOIN player p ON mg.player_id = p.id \
         WHERE {} \
         GROUP BY mg.player_id, p.player_name \
         HAVING COUNT(*) >= {} \
         ORDER BY clean_sheets DESC, matches_played DESC, mg.player_id \
         LIMIT {}",
        filter.where_clause(),
        MIN_KEEPER_APPEARANCES,
        limit
    );
    let leaderboard = state.reader.fetch_all(filter.statement(sql)).await?;

    Ok(Json(json!({
        "season": season_label(query.season),
        "leaderboard": leaderboard,
    })))
}

/// Overall record, home/away splits and top scorers for one team-season
#[utoipa::path(
    get,
    path = "/api/v1/stats/team/{team_id}/season/{season}",
    tag = "Statistics",
    params(
        ("team_id" = String, Path, description = "Team id"),
        ("season" = i32, Path, description = "Season year")
    ),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{team_id, season, overall, home_away_splits, top_scorers}`", body = Object),
        (status = 404, description = "No matches for this team and season", body = ErrorBody),
        (status = 422, description = "Season is not a number", body = ErrorBody)
    )
)]
pub async fn team_season(
    State(state): State<ResourceState>,
    ApiPath((team_id, season)): ApiPath<(String, i32)>,
) -> ApiResult<Json<JsonValue>> {
    let reader = &state.reader;

    let mut summary = reader.filter();
    summary
        .eq("team_id::text", Some(team_id.as_str()))
        .eq("season_id", Some(season));

    let overall = reader
        .fetch_optional(summary.statement(format!(
            "SELECT COUNT(*) AS matches_played, \
                    SUM(CASE WHEN outcome = 'Win' THEN 1 ELSE 0 END)::bigint AS wins, \
                    SUM(CASE WHEN outcome = 'Draw' THEN 1 ELSE 0 END)::bigint AS draws, \
                    SUM(CASE WHEN outcome = 'Loss' THEN 1 ELSE 0 END)::bigint AS losses, \
                    SUM(goals_for)::bigint AS goals_for, \
                    SUM(goals_against)::bigint AS goals_against, \
                    SUM(points)::bigint AS points, \
                    ROUND(AVG(total_passes_attempted)::numeric, 1)::float8 AS avg_passes, \
                    ROUND(AVG(pass_completion_pct)::numeric, 1)::float8 AS avg_pass_completion, \
                    ROUND(AVG(total_shots)::numeric, 1)::float8 AS avg_shots, \
                    ROUND(AVG(total_xg)::numeric, 2)::float8 AS avg_xg \
             FROM match_team_summary \
             WHERE {}",
            summary.where_clause()
        )))
        .await?
        .filter(|row| row["matches_played"].as_i64().unwrap_or(0) > 0)
        .ok_or_else(|| DomainError::not_found("No data found for this team/season"))?;

    let home_away_splits = reader
        .fetch_all(summary.statement(format!(
            "SELECT is_home, COUNT(*) AS matches, \
                    SUM(CASE WHEN outcome = 'Win' THEN 1 ELSE 0 END)::bigint AS wins, \
                    SUM(CASE WHEN outcome = 'Draw' THEN 1 ELSE 0 END)::bigint AS draws, \
                    SUM(CASE WHEN outcome = 'Loss' THEN 1 ELSE 0 END)::bigint AS losses, \
                    SUM(goals_for)::bigint AS goals_for, \
                    SUM(goals_against)::bigint AS goals_against \
             FROM match_team_summary \
             WHERE {} \
             GROUP BY is_home \
             ORDER BY is_home DESC",
            summary.where_clause()
        )))
        .await?;

    let mut scorers = reader.filter();
    scorers
        .fixed("me.type = 'goal'")
        .eq("me.team_uuid::text", Some(team_id.as_str()))
        .eq("me.season_id", Some(season));
    let top_scorers = reader
        .fetch_all(scorers.statement(format!(
            "SELECT p.id, p.player_name, COUNT(*) AS goals \
             FROM match_event me \
             JOIN player p ON me.goal_player_id = p.id \
             WHERE {} \
             GROUP BY p.id, p.player_name \
             ORDER BY goals DESC, p.id \
             LIMIT {}",
            scorers.where_clause(),
            TOP_SCORERS
        )))
        .await?;

    Ok(Json(json!({
        "team_id": team_id,
        "season": season,
        "overall": overall,
        "home_away_splits": home_away_splits,
        "top_scorers": top_scorers,
    })))
}

/// Career totals and a per-season breakdown
#[utoipa::path(
    get,
    path = "/api/v1/stats/player/{player_id}/career",
    tag = "Statistics",
    params(("player_id" = String, Path, description = "Player id")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "`{player_id, career_totals, season_breakdown}`", body = Object),
        (status = 404, description = "Player has no appearances", body = ErrorBody)
    )
)]
pub async fn player_career(
    State(state): State<ResourceState>,
    ApiPath(player_id): ApiPath<String>,
) -> ApiResult<Json<JsonValue>> {
    let reader = &state.reader;
    let mut filter = reader.filter();
    let player = filter.bind(player_id.clone());

    let career = reader
        .fetch_optional(filter.statement(format!(
            "SELECT COUNT(DISTINCT match_id) AS total_matches, \
                    COUNT(DISTINCT season_id) AS seasons_played, \
                    MIN(season_id) AS first_season, \
                    MAX(season_id) AS last_season, \
                    SUM(minutes_played)::bigint AS total_minutes, \
                    COUNT(DISTINCT team_id) AS teams_played_for \
             FROM match_lineup \
             WHERE player_id::text = {p}",
            p = player
        )))
        .await?
        .filter(|row| row["total_matches"].as_i64().unwrap_or(0) > 0)
        .ok_or_else(|| DomainError::not_found("No career data found for this player"))?;

    let scoring = reader
        .fetch_optional(filter.statement(format!(
            "SELECT COUNT(CASE WHEN goal_player_id::text = {p} THEN 1 END) AS career_goals, \
                    COUNT(CASE WHEN assist_player_id::text = {p} THEN 1 END) AS career_assists \
             FROM match_event \
             WHERE goal_player_id::text = {p} OR assist_player_id::text = {p}",
            p = player
        )))
        .await?;

    // Appearances and contributions are aggregated separately so joining
    // events cannot multiply lineup minutes.
    let season_breakdown = reader
        .fetch_all(filter.statement(format!(
            "WITH apps AS ( \
                 SELECT season_id, COUNT(DISTINCT match_id) AS matches, \
                        SUM(minutes_played)::bigint AS minutes \
                 FROM match_lineup \
                 WHERE player_id::text = {p} \
                 GROUP BY season_id \
             ), contrib AS ( \
                 SELECT season_id, \
                        COUNT(CASE WHEN goal_player_id::text = {p} THEN 1 END) AS goals, \
                        COUNT(CASE WHEN assist_player_id::text = {p} THEN 1 END) AS assists \
                 FROM match_event \
                 WHERE goal_player_id::text = {p} OR assist_player_id::text = {p} \
                 GROUP BY season_id \
             ) \
             SELECT apps.season_id, apps.matches, apps.minutes, \
                    COALESCE(contrib.goals, 0) AS goals, \
                    COALESCE(contrib.assists, 0) AS assists \
             FROM apps \
             LEFT JOIN contrib ON apps.season_id = contrib.season_id \
             ORDER BY apps.season_id DESC",
            p = player
        )))
        .await?;

    let mut career_totals = career;
    if let (Some(totals), Some(JsonValue::Object(extra))) = (career_totals.as_object_mut(), scoring) {
        totals.extend(extra);
    }

    Ok(Json(json!({
        "player_id": player_id,
        "career_totals": career_totals,
        "season_breakdown": season_breakdown,
    })))
}
