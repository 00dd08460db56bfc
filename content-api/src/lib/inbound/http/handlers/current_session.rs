use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn current_session(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<CurrentSessionData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentSessionData {
    pub user_id: i64,
    pub role: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub claims: Map<String, Value>,
}

impl From<&AuthenticatedUser> for CurrentSessionData {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role.clone(),
            issued_at: user.claims.iat,
            expires_at: user.claims.exp,
            claims: user.claims.extra.clone(),
        }
    }
}
