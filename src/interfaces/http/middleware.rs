//! API key middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::api_keys::rate_limit::{LIMIT_HEADER, REMAINING_HEADER};
use crate::application::{check_rate_limit, ApiKeyService};
use crate::interfaces::http::common::ErrorBody;

#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<ApiKeyService>,
}

/// Verify the API key header and attach the `Caller` to the request.
///
/// Handlers behind this layer can extract `Extension<Caller>`.
pub async fn api_key_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let settings = state.service.settings();
    let token = request
        .headers()
        .get(settings.header_name.as_str())
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let caller = match state.service.verify(token.as_deref()).await {
        Ok(caller) => caller,
        Err(e) => {
            debug!(path = %request.uri().path(), "API key rejected: {}", e);
            return e.into_response();
        }
    };

    let status = check_rate_limit(&caller, settings.default_rate_limit);
    if !status.allowed {
        return ErrorBody::new(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")
            .into_response_with(StatusCode::TOO_MANY_REQUESTS);
    }
    request.extensions_mut().insert(caller);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(status.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(status.remaining));
    response
}
