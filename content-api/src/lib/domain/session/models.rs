use std::str::FromStr;

use auth::Identity;
use auth::TokenPayload;

use super::errors::EmailError;

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// Surrounding whitespace is dropped and the address is lowercased so
    /// lookups match the stored form.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to open a session with validated credentials
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Session opened by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Identity,
    pub access_token: String,

    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Token issued in exchange for a valid or expired one.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in: i64,

    /// Payload carried by `access_token`
    pub payload: TokenPayload,
}
