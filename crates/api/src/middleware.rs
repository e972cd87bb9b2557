use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app::errors;

/// Header checked on inbound requests (and attached by the inventory
/// service's outbound transport).
pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone)]
pub struct AuthState {
    pub api_key: Arc<String>,
}

impl AuthState {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Arc::new(api_key.into()),
        }
    }
}

/// Reject requests without the shared API key.
pub async fn api_key_middleware(
    State(state): State<AuthState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if !key_matches(req.headers(), &state.api_key) {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Invalid or missing API key",
        );
    }

    next.run(req).await
}

fn key_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == expected)
}
