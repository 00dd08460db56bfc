use std::fmt;
use std::sync::Arc;

use super::claims::Claims;
use super::claims::Header;
use super::claims::TokenPayload;
use super::codec::TokenCodec;
use super::errors::InvalidReason;
use super::errors::RefreshError;
use super::errors::TokenError;
use super::signer::Signer;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::directory::Identity;
use crate::directory::UserDirectory;

/// Process-wide token settings, loaded once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,

    /// Token lifetime in seconds
    pub token_expiry: i64,

    /// Seconds a token is still accepted past its `exp`
    pub leeway_seconds: i64,
}

impl TokenConfig {
    const RECOMMENDED_SECRET_BYTES: usize = 32;

    pub fn new(secret: impl Into<String>, token_expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            token_expiry,
            leeway_seconds: 0,
        }
    }

    pub fn with_leeway(mut self, leeway_seconds: i64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

/// Outcome of validating a token.
///
/// Produced fresh on every call; nothing is cached.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(TokenPayload),
    Expired(TokenPayload),
    Invalid(InvalidReason),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }
}

/// Issues, validates and refreshes stateless tokens.
///
/// Validation is a pure function of the token, the secret and the clock,
/// so a single instance can be shared across any number of tasks.
pub struct TokenService<D, C = SystemClock>
where
    D: UserDirectory + ?Sized,
    C: Clock,
{
    signer: Signer,
    ttl: i64,
    leeway: i64,
    directory: Arc<D>,
    clock: C,
}

impl<D> TokenService<D, SystemClock>
where
    D: UserDirectory + ?Sized,
{
    /// Create a token service using the wall clock.
    ///
    /// # Arguments
    /// * `config` - Secret, TTL and leeway
    /// * `directory` - Identity source consulted on refresh
    ///
    /// # Errors
    /// * `InvalidConfig` - Secret is empty, TTL is not positive or leeway is negative
    pub fn new(config: &TokenConfig, directory: Arc<D>) -> Result<Self, TokenError> {
        if config.token_expiry <= 0 {
            return Err(TokenError::InvalidConfig(format!(
                "token_expiry must be positive, got {}",
                config.token_expiry
            )));
        }

        if config.leeway_seconds < 0 {
            return Err(TokenError::InvalidConfig(format!(
                "leeway_seconds must not be negative, got {}",
                config.leeway_seconds
            )));
        }

        if config.secret.len() < TokenConfig::RECOMMENDED_SECRET_BYTES {
            tracing::warn!(
                secret_bytes = config.secret.len(),
                recommended = TokenConfig::RECOMMENDED_SECRET_BYTES,
                "Token signing secret is shorter than recommended"
            );
        }

        Ok(Self {
            signer: Signer::new(config.secret.as_bytes())?,
            ttl: config.token_expiry,
            leeway: config.leeway_seconds,
            directory,
            clock: SystemClock,
        })
    }
}

impl<D, C> TokenService<D, C>
where
    D: UserDirectory + ?Sized,
    C: Clock,
{
    /// Replace the clock used for issuance and expiry checks.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> TokenService<D, C2> {
        TokenService {
            signer: self.signer,
            ttl: self.ttl,
            leeway: self.leeway,
            directory: self.directory,
            clock,
        }
    }

    /// Configured token lifetime in seconds.
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Issue a token for `claims` valid for `ttl_seconds` from now.
    ///
    /// A non-positive TTL yields a token that is already at or past expiry.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized
    pub fn issue(&self, claims: Claims, ttl_seconds: i64) -> Result<String, TokenError> {
        let payload = TokenPayload::issue(claims, self.clock.now(), ttl_seconds);
        let (header_segment, payload_segment) = TokenCodec::encode(&Header::default(), &payload)?;
        let signature = self.signer.sign(&header_segment, &payload_segment);

        Ok(TokenCodec::join(
            &header_segment,
            &payload_segment,
            &signature,
        ))
    }

    /// Issue a token for a directory identity with the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized
    pub fn issue_for(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue(Claims::for_identity(identity), self.ttl)
    }

    /// Validate a token's structure, signature and expiry.
    ///
    /// Never fails: every outcome is a [`ValidationResult`] variant.
    pub fn validate(&self, token: &str) -> ValidationResult {
        let segments = match TokenCodec::decode(token) {
            Ok(segments) => segments,
            Err(reason) => return self.reject(reason),
        };

        if !self
            .signer
            .verify(segments.header, segments.payload, segments.signature)
        {
            return self.reject(InvalidReason::BadSignature);
        }

        let payload = match TokenCodec::decode_payload(segments.payload) {
            Ok(payload) => payload,
            Err(reason) => return self.reject(reason),
        };

        let now = self.clock.now();
        if payload.is_expired(now, self.leeway) {
            tracing::debug!(
                user_id = payload.user_id,
                exp = payload.exp,
                now,
                "Token expired"
            );
            return ValidationResult::Expired(payload);
        }

        ValidationResult::Valid(payload)
    }

    /// Issue a fresh token for a user after re-resolving them.
    ///
    /// The directory lookup is unconditional so that deactivated users and
    /// role changes take effect at the next refresh.
    ///
    /// # Errors
    /// * `UserNotFound` - No active user with this id
    /// * `Directory` - Directory lookup failed
    /// * `Token` - Token encoding failed
    pub async fn refresh(&self, user_id: i64) -> Result<String, RefreshError> {
        let identity = self
            .directory
            .lookup_active_user(user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id, error = %e, "Directory lookup failed during refresh");
                RefreshError::from(e)
            })?
            .ok_or_else(|| {
                tracing::warn!(user_id, "Refresh requested for unknown or inactive user");
                RefreshError::UserNotFound(user_id)
            })?;

        let token = self.issue_for(&identity)?;
        tracing::info!(user_id, role = %identity.role, "Token refreshed");

        Ok(token)
    }

    fn reject(&self, reason: InvalidReason) -> ValidationResult {
        tracing::debug!(reason = ?reason, "Token rejected");
        ValidationResult::Invalid(reason)
    }
}
