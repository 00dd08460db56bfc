use auth::bearer_token;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;

/// Exchange the presented bearer token, valid or expired, for a new one.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    state
        .session_service
        .refresh(token)
        .await
        .map_err(ApiError::from)
        .map(|refreshed| {
            ApiSuccess::new(
                StatusCode::OK,
                RefreshResponseData {
                    token: refreshed.access_token,
                    token_type: "Bearer".to_string(),
                    expires_in: refreshed.expires_in,
                    expires_at: refreshed.payload.exp,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: i64,
}
