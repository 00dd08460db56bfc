use thiserror::Error;

use crate::directory::DirectoryError;

/// Reason a presented token was rejected outright.
///
/// None of these are refreshable: only a structurally sound, correctly
/// signed token that has passed its expiry may be exchanged for a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("Token does not have exactly three segments")]
    MalformedToken,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token payload is not a valid claims object")]
    MalformedPayload,
}

/// Error type for token issuance and configuration.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Invalid token configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

/// Error type for token refresh.
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    #[error("No active user with id {0}")]
    UserNotFound(i64),

    #[error("User directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}
