use auth::Authentication;
use auth::Principal;
use auth::TokenPayload;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;

/// Response header carrying a token minted by auto-refresh.
pub const REFRESHED_TOKEN_HEADER: &str = "x-refreshed-token";

/// Roles allowed on editorial routes.
pub const EDITORIAL_ROLES: &[&str] = &["admin", "editor"];

/// Extension type to store the authenticated principal in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: String,
    pub claims: TokenPayload,
}

impl From<TokenPayload> for AuthenticatedUser {
    fn from(claims: TokenPayload) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role.clone(),
            claims,
        }
    }
}

impl Principal for AuthenticatedUser {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn role(&self) -> &str {
        &self.role
    }
}

/// Middleware that validates bearer tokens and adds the principal to request extensions
///
/// Expired tokens are rejected unless auto-refresh is enabled, in which case
/// the request continues under a freshly issued token that is returned in
/// the `X-Refreshed-Token` header.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authentication = state.gate.authenticate(req.headers());

    match authentication {
        Authentication::Valid(payload) => {
            req.extensions_mut().insert(AuthenticatedUser::from(payload));
            Ok(next.run(req).await)
        }
        Authentication::Expired(payload) if state.auto_refresh => {
            let refreshed = state
                .session_service
                .refresh_user(payload.user_id)
                .await
                .map_err(ApiError::from)?;

            let header_value = HeaderValue::from_str(&refreshed.access_token)
                .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

            req.extensions_mut()
                .insert(AuthenticatedUser::from(refreshed.payload));

            let mut response = next.run(req).await;
            response
                .headers_mut()
                .insert(HeaderName::from_static(REFRESHED_TOKEN_HEADER), header_value);
            Ok(response)
        }
        Authentication::Expired(_) => Err(ApiError::Unauthorized("Token expired".to_string())),
        Authentication::Invalid(_) => Err(ApiError::Unauthorized("Invalid token".to_string())),
        Authentication::Anonymous => {
            Err(ApiError::Unauthorized("Missing bearer token".to_string()))
        }
    }
}

/// Middleware that admits only editorial roles; must run after [`authenticate`]
pub async fn require_editorial_role(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req.extensions().get::<AuthenticatedUser>();

    if !auth::require_role(user, EDITORIAL_ROLES) {
        return Err(ApiError::Forbidden("Insufficient role".to_string()));
    }

    Ok(next.run(req).await)
}
