use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Minimal identity record resolved by a [`UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Error type for directory lookups.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("User directory unavailable: {0}")]
    Unavailable(String),

    #[error("Credential check failed: {0}")]
    CredentialCheck(String),
}

/// Source of user identities.
///
/// Implemented by the hosting service; the token core only reads through it.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Resolve an active user by id.
    ///
    /// # Returns
    /// The identity, or `None` when the user is absent or deactivated
    ///
    /// # Errors
    /// * `Unavailable` - Directory could not be reached
    async fn lookup_active_user(&self, id: i64) -> Result<Option<Identity>, DirectoryError>;

    /// Check an email and password pair.
    ///
    /// # Returns
    /// The identity when the credentials match an active user, `None` otherwise
    ///
    /// # Errors
    /// * `Unavailable` - Directory could not be reached
    /// * `CredentialCheck` - Stored credential could not be verified
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, DirectoryError>;
}

/// Anything that carries a user id and a role.
pub trait Principal {
    fn user_id(&self) -> i64;
    fn role(&self) -> &str;
}

impl Principal for Identity {
    fn user_id(&self) -> i64 {
        self.id
    }

    fn role(&self) -> &str {
        &self.role
    }
}
