use async_trait::async_trait;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RefreshedToken;
use crate::domain::session::models::Session;

/// Port for session domain service operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Session with the resolved identity and a fresh token
    ///
    /// # Errors
    /// * `InvalidCredentials` - No active user matches the credentials
    /// * `Directory` - User directory lookup failed
    /// * `Token` - Token issuance failed
    async fn login(&self, command: LoginCommand) -> Result<Session, SessionError>;

    /// Exchange a correctly signed token, expired or not, for a new one.
    ///
    /// # Arguments
    /// * `token` - Compact token presented by the client
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed or its signature does not match
    /// * `UserNotFound` - Token owner is absent or deactivated
    /// * `Directory` - User directory lookup failed
    async fn refresh(&self, token: &str) -> Result<RefreshedToken, SessionError>;

    /// Issue a new token for a user id taken from an already verified token.
    ///
    /// # Errors
    /// * `UserNotFound` - User is absent or deactivated
    /// * `Directory` - User directory lookup failed
    async fn refresh_user(&self, user_id: i64) -> Result<RefreshedToken, SessionError>;
}
