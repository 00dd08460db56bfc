use auth::InvalidReason;
use auth::RefreshError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all session operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(InvalidReason),

    #[error("No active user with id {0}")]
    UserNotFound(i64),

    // Infrastructure errors
    #[error("User directory error: {0}")]
    Directory(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl From<RefreshError> for SessionError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::UserNotFound(id) => SessionError::UserNotFound(id),
            RefreshError::Directory(e) => SessionError::Directory(e.to_string()),
            RefreshError::Token(e) => SessionError::Token(e.to_string()),
        }
    }
}
