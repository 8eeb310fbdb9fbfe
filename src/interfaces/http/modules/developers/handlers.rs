//! Developer access: self-service key registration, listing and revocation

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, Json};

use super::dto::{
    ApiKeyView, KeyListResponse, OwnerEmail, RegisterRequest, RegisterResponse, RevokeResponse,
    ServiceInfo, UsageInstructions,
};
use crate::application::ApiKeyService;
use crate::config::PublicConfig;
use crate::interfaces::http::common::{validate, ApiPath, ApiQuery, ApiResult, ErrorBody, ValidatedJson};

const REGISTER_PAGE: &str = include_str!("register.html");

#[derive(Clone)]
pub struct DeveloperState {
    pub service: Arc<ApiKeyService>,
    pub public: PublicConfig,
}

/// Register and receive an API key
#[utoipa::path(
    post,
    path = "/register",
    tag = "Developer Access",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Key created; shown only in this response", body = RegisterResponse),
        (status = 400, description = "A key with this name already exists for this email", body = ErrorBody),
        (status = 422, description = "Invalid name or email", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<DeveloperState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let issued = state.service.issue(&request.name, &request.email).await?;
    let header = state.service.settings().header_name.clone();

    let example = format!(
        "curl -H '{}: {}' {}/api/v1/teams/",
        header,
        issued.key,
        state.public.base_url.trim_end_matches('/')
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "API key created successfully".to_string(),
            api_key: issued.key,
            instructions: UsageInstructions { header, example },
        }),
    ))
}

/// HTML form that posts to `POST /register`
#[utoipa::path(
    get,
    path = "/register",
    tag = "Developer Access",
    responses((status = 200, description = "Registration page", body = String, content_type = "text/html"))
)]
pub async fn registration_page() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

/// List every key registered under an email
#[utoipa::path(
    get,
    path = "/keys/{email}",
    tag = "Developer Access",
    params(("email" = String, Path, description = "Owner email")),
    responses(
        (status = 200, description = "Keys, newest first", body = KeyListResponse),
        (status = 404, description = "No keys for this email", body = ErrorBody),
        (status = 422, description = "Malformed email", body = ErrorBody)
    )
)]
pub async fn list_keys(
    State(state): State<DeveloperState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<KeyListResponse>> {
    let owner = OwnerEmail::new(email);
    validate(&owner)?;

    let keys: Vec<ApiKeyView> = state
        .service
        .list(&owner.email)
        .await?
        .into_iter()
        .map(ApiKeyView::from)
        .collect();

    Ok(Json(KeyListResponse {
        email: owner.email,
        total: keys.len(),
        keys,
    }))
}

/// Revoke a key. The caller proves ownership by naming the owner email.
#[utoipa::path(
    delete,
    path = "/keys/{key_id}",
    tag = "Developer Access",
    params(("key_id" = String, Path, description = "Key id"), OwnerEmail),
    responses(
        (status = 200, description = "Key revoked", body = RevokeResponse),
        (status = 404, description = "No such key for this email", body = ErrorBody),
        (status = 422, description = "Malformed email", body = ErrorBody)
    )
)]
pub async fn revoke_key(
    State(state): State<DeveloperState>,
    ApiPath(key_id): ApiPath<String>,
    ApiQuery(owner): ApiQuery<OwnerEmail>,
) -> ApiResult<Json<RevokeResponse>> {
    validate(&owner)?;
    state.service.revoke(&key_id, &owner.email).await?;

    Ok(Json(RevokeResponse {
        success: true,
        message: "API key has been revoked".to_string(),
    }))
}

/// Service information
#[utoipa::path(
    get,
    path = "/",
    tag = "Developer Access",
    responses((status = 200, description = "Service information", body = ServiceInfo))
)]
pub async fn service_info(State(state): State<DeveloperState>) -> Json<ServiceInfo> {
    let base = state.public.base_url.trim_end_matches('/');
    Json(ServiceInfo {
        name: "NWSL API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documentation: format!("{}/docs", base),
        registration: format!("{}/register", base),
        status: "healthy".to_string(),
        demo_key: state.service.settings().demo_key.clone(),
    })
}
