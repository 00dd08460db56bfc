use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::directory::Principal;
use crate::directory::UserDirectory;
use crate::jwt::InvalidReason;
use crate::jwt::TokenPayload;
use crate::jwt::TokenService;
use crate::jwt::ValidationResult;

const BEARER_SCHEME: &str = "Bearer";

/// Outcome of authenticating an inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum Authentication {
    /// No bearer credentials were presented
    Anonymous,
    Valid(TokenPayload),
    Expired(TokenPayload),
    Invalid(InvalidReason),
}

impl From<ValidationResult> for Authentication {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Valid(payload) => Authentication::Valid(payload),
            ValidationResult::Expired(payload) => Authentication::Expired(payload),
            ValidationResult::Invalid(reason) => Authentication::Invalid(reason),
        }
    }
}

/// Request-level authentication on top of a [`TokenService`].
pub struct AuthGate<D, C = SystemClock>
where
    D: UserDirectory + ?Sized,
    C: Clock,
{
    tokens: Arc<TokenService<D, C>>,
}

impl<D, C> Clone for AuthGate<D, C>
where
    D: UserDirectory + ?Sized,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<D, C> AuthGate<D, C>
where
    D: UserDirectory + ?Sized,
    C: Clock,
{
    pub fn new(tokens: Arc<TokenService<D, C>>) -> Self {
        Self { tokens }
    }

    /// Token service backing this gate.
    pub fn tokens(&self) -> &Arc<TokenService<D, C>> {
        &self.tokens
    }

    /// Authenticate a request from its headers.
    ///
    /// A missing or non-bearer `Authorization` header is `Anonymous`, not an
    /// error; anything that looks like a bearer token is validated and the
    /// result returned as is.
    pub fn authenticate(&self, headers: &HeaderMap) -> Authentication {
        let Some(token) = bearer_token(headers) else {
            tracing::debug!("No bearer token presented");
            return Authentication::Anonymous;
        };

        let result = self.tokens.validate(token);
        match &result {
            ValidationResult::Valid(payload) => {
                tracing::debug!(user_id = payload.user_id, "Request authenticated");
            }
            ValidationResult::Expired(payload) => {
                tracing::info!(user_id = payload.user_id, "Request presented expired token");
            }
            ValidationResult::Invalid(reason) => {
                tracing::warn!(reason = %reason, "Request presented invalid token");
            }
        }

        result.into()
    }
}

/// Check that a principal is present and holds one of `allowed_roles`.
///
/// Roles are compared exactly (case-sensitive, no hierarchy).
pub fn require_role<P>(identity: Option<&P>, allowed_roles: &[&str]) -> bool
where
    P: Principal + ?Sized,
{
    match identity {
        Some(principal) => {
            let allowed = allowed_roles
                .iter()
                .any(|allowed| *allowed == principal.role());
            if !allowed {
                tracing::warn!(
                    user_id = principal.user_id(),
                    role = principal.role(),
                    allowed_roles = ?allowed_roles,
                    "Role not permitted"
                );
            }
            allowed
        }
        None => false,
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme != BEARER_SCHEME {
        return None;
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    Some(token)
}
