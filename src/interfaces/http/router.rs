//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::ApiKeyService;
use crate::config::{AppConfig, CorsConfig};
use crate::infrastructure::database::DatasetReader;
use crate::interfaces::http::common::{ErrorBody, ResourceState};
use crate::interfaces::http::middleware::{api_key_middleware, AuthState};
use crate::interfaces::http::modules::{
    developers, events, health, matches, metrics, players, request_id, stats, teams, venues,
};
use crate::shared::PaginationMeta;

/// Security scheme modifier for OpenAPI
struct SecurityAddon {
    header_name: String,
}

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    self.header_name.as_str(),
                    "Key from POST /register, or the public demo key",
                ))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Developer access
        developers::service_info,
        developers::registration_page,
        developers::register,
        developers::list_keys,
        developers::revoke_key,
        // Health
        health::health_check,
        health::readiness_check,
        // Teams
        teams::list_teams,
        teams::get_team,
        teams::team_players,
        teams::team_matches,
        teams::team_stats,
        // Players
        players::list_players,
        players::get_player,
        players::player_matches,
        players::player_stats,
        players::player_teams,
        // Matches
        matches::list_matches,
        matches::get_match,
        matches::match_lineups,
        matches::match_events,
        matches::match_stats,
        // Events
        events::list_events,
        events::list_goals,
        events::list_cards,
        // Venues
        venues::list_venues,
        venues::get_venue,
        venues::venue_matches,
        venues::venue_stats,
        // Statistics
        stats::goal_leaders,
        stats::assist_leaders,
        stats::clean_sheet_leaders,
        stats::team_season,
        stats::player_career,
    ),
    components(
        schemas(
            ErrorBody,
            PaginationMeta,
            developers::RegisterRequest,
            developers::RegisterResponse,
            developers::UsageInstructions,
            developers::ApiKeyView,
            developers::KeyListResponse,
            developers::RevokeResponse,
            developers::ServiceInfo,
            health::HealthResponse,
            health::ReadyResponse,
            events::CardType,
        )
    ),
    tags(
        (name = "Developer Access", description = "API key registration and management"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Teams", description = "Clubs and their seasons"),
        (name = "Players", description = "Player profiles, appearances and statistics"),
        (name = "Matches", description = "Fixtures, lineups, events and team summaries"),
        (name = "Events", description = "Goals, cards and substitutions"),
        (name = "Venues", description = "Stadiums and their match history"),
        (name = "Statistics", description = "Leaderboards and aggregate breakdowns"),
    ),
    info(
        title = "NWSL Data API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Statistics for the National Women's Soccer League. Resource endpoints require an API key."
    )
)]
pub struct ApiDoc;

fn openapi_for(header_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    SecurityAddon {
        header_name: header_name.to_string(),
    }
    .modify(&mut doc);
    doc
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router with Swagger UI
pub fn create_api_router(
    db: DatabaseConnection,
    service: Arc<ApiKeyService>,
    cfg: &AppConfig,
    metrics_handle: PrometheusHandle,
) -> Router {
    let reader = DatasetReader::new(db);

    // ── Developer access (public) ──────────────────────────────
    let developer_routes = Router::new()
        .route("/", get(developers::service_info))
        .route(
            "/register",
            get(developers::registration_page).post(developers::register),
        )
        // GET takes an email, DELETE a key id; axum needs one pattern per segment
        .route(
            "/keys/{key}",
            get(developers::list_keys).delete(developers::revoke_key),
        )
        .with_state(developers::DeveloperState {
            service: Arc::clone(&service),
            public: cfg.public.clone(),
        });

    // ── Health & metrics (public) ──────────────────────────────
    let health_routes = Router::new()
        .route("/", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(health::HealthState {
            reader: reader.clone(),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: metrics_handle,
        });

    // ── Dataset resources (API key required) ───────────────────
    let resource_state = ResourceState {
        reader,
        pagination: cfg.pagination.clone(),
        dataset: cfg.dataset.clone(),
    };
    let resource_routes = Router::new()
        .nest("/teams", teams::routes())
        .nest("/players", players::routes())
        .nest("/matches", matches::routes())
        .nest("/events", events::routes())
        .nest("/venues", venues::routes())
        .nest("/stats", stats::routes())
        .layer(middleware::from_fn_with_state(
            AuthState { service },
            api_key_middleware,
        ))
        .with_state(resource_state);

    let swagger_routes = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", openapi_for(&cfg.auth.header_name));

    // Build router
    Router::new()
        .merge(swagger_routes)
        .merge(developer_routes)
        .merge(metrics_routes)
        .nest("/health", health_routes)
        .nest("/api/v1", resource_routes)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors_layer(&cfg.cors))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sea_orm::ConnectionTrait;
    use serde_json::{json, Value};
    use tower::Service;

    use super::*;
    use crate::config::AuthConfig;
    use crate::infrastructure::database::testing::memory_database;
    use crate::infrastructure::database::ApiKeyRepository;
    use crate::interfaces::http::common::testing::ShareConnection;

    async fn app() -> Router {
        let db = memory_database().await;
        db.execute_unprepared(
            "CREATE TABLE team (id TEXT PRIMARY KEY, team_id TEXT, team_name TEXT, \
             team_name_long TEXT, active_2024 BOOLEAN, active_2025 BOOLEAN, created_at TEXT)",
        )
        .await
        .unwrap();
        db.execute_unprepared(
            "INSERT INTO team (id, team_id, team_name) VALUES ('t1', 'POR', 'Portland Thorns')",
        )
        .await
        .unwrap();

        let repo = Arc::new(ApiKeyRepository::new(db.clone()));
        let service = Arc::new(ApiKeyService::new(repo, AuthConfig::default()));
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(db, service, &AppConfig::default(), handle)
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = router
            .clone()
            .into_service()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn key_lifecycle_gates_resource_access() {
        let router = app().await;

        let (status, registered) = send(
            &router,
            Method::POST,
            "/register",
            None,
            Some(json!({"name": "my app", "email": "dev@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let key = registered["api_key"].as_str().unwrap().to_string();
        assert_eq!(registered["instructions"]["header"], "X-API-Key");

        let (status, teams) = send(&router, Method::GET, "/api/v1/teams", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(teams["teams"][0]["team_name"], "Portland Thorns");
        assert_eq!(teams["pagination"]["total"], 1);

        let (status, listing) =
            send(&router, Method::GET, "/keys/dev@example.com", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["total"], 1);
        assert_eq!(listing["keys"][0]["usage_count"], 1);
        let key_id = listing["keys"][0]["id"].as_str().unwrap().to_string();

        let (status, revoked) = send(
            &router,
            Method::DELETE,
            &format!("/keys/{}?email=dev@example.com", key_id),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(revoked["success"], true);

        let (status, body) = send(&router, Method::GET, "/api/v1/teams", Some(&key), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Invalid API key");

        let (_, listing) = send(&router, Method::GET, "/keys/dev@example.com", None, None).await;
        assert_eq!(listing["keys"][0]["is_active"], false);
    }

    #[tokio::test]
    async fn resources_require_a_key() {
        let router = app().await;

        let (status, body) = send(&router, Method::GET, "/api/v1/teams", None, None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status_code"], 403);
        assert_eq!(body["detail"], "API key required. Get one at /register");
    }

    #[tokio::test]
    async fn public_routes_need_no_key() {
        let router = app().await;

        let (status, info) = send(&router, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["status"], "healthy");

        let (status, health) = send(&router, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["database"], "connected");

        let (status, _) = send(&router, Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn registration_rejects_bad_email_and_duplicates() {
        let router = app().await;
        let request = json!({"name": "app", "email": "dev@example.com"});

        let (status, _) = send(
            &router,
            Method::POST,
            "/register",
            None,
            Some(json!({"name": "app", "email": "not-an-email"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) =
            send(&router, Method::POST, "/register", None, Some(request.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&router, Method::POST, "/register", None, Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status_code"], 400);
    }

    #[tokio::test]
    async fn key_listing_for_unknown_email_is_404() {
        let router = app().await;

        let (status, body) =
            send(&router, Method::GET, "/keys/nobody@example.com", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "No API keys found for this email");
    }

    #[tokio::test]
    async fn revocation_with_malformed_email_is_422() {
        let router = app().await;

        let (status, _) =
            send(&router, Method::DELETE, "/keys/some-id?email=nope", None, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let router = app().await;
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let resp = router.into_service().call(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[test]
    fn openapi_documents_configured_key_header() {
        let doc = openapi_for("X-Custom-Key");
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            json["components"]["securitySchemes"]["api_key"]["name"],
            "X-Custom-Key"
        );
        assert!(json["paths"]["/api/v1/teams"].is_object());
        assert!(json["paths"]["/keys/{email}"]["get"].is_object());
        assert!(json["paths"]["/keys/{key_id}"]["delete"].is_object());
    }
}
