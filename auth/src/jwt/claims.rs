use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::directory::Identity;
use crate::directory::Principal;

/// Fixed token header.
///
/// Field order is part of the wire format: `{"typ":"JWT","alg":"HS256"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub typ: String,
    pub alg: String,
}

impl Header {
    pub const TYPE: &'static str = "JWT";
    pub const ALGORITHM: &'static str = "HS256";
}

impl Default for Header {
    fn default() -> Self {
        Self {
            typ: Self::TYPE.to_string(),
            alg: Self::ALGORITHM.to_string(),
        }
    }
}

/// Caller-supplied claims, before issuance stamps `iat` and `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: i64,
    pub role: String,

    /// Additional custom claims (flattened into the payload)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Create claims for a user and role with no additional fields.
    pub fn new(user_id: i64, role: impl ToString) -> Self {
        Self {
            user_id,
            role: role.to_string(),
            extra: Map::new(),
        }
    }

    /// Create claims for a directory identity.
    ///
    /// Name and email travel as extra claims so clients can display the
    /// session owner without another round trip.
    pub fn for_identity(identity: &Identity) -> Self {
        Self::new(identity.id, &identity.role)
            .with_claim("name", &identity.name)
            .with_claim("email", &identity.email)
    }

    /// Add a custom claim.
    ///
    /// The reserved names `user_id`, `role`, `iat` and `exp` are ignored.
    pub fn with_claim(mut self, key: impl ToString, value: impl Serialize) -> Self {
        let key = key.to_string();
        if TokenPayload::RESERVED.contains(&key.as_str()) {
            return self;
        }
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key, json_value);
        }
        self
    }
}

/// Signed token payload.
///
/// Created once by issuance and never edited; a refresh always produces a
/// new payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPayload {
    pub user_id: i64,
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenPayload {
    const RESERVED: [&'static str; 4] = ["user_id", "role", "iat", "exp"];

    /// Stamp claims with an issuance time and lifetime.
    ///
    /// Reserved names in `claims.extra` are dropped so the stamped fields
    /// are the only ones serialized.
    pub fn issue(claims: Claims, issued_at: i64, ttl_seconds: i64) -> Self {
        let mut extra = claims.extra;
        extra.retain(|key, _| !Self::RESERVED.contains(&key.as_str()));

        Self {
            user_id: claims.user_id,
            role: claims.role,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_seconds),
            extra,
        }
    }

    /// Claims this payload was issued from.
    pub fn claims(&self) -> Claims {
        Claims {
            user_id: self.user_id,
            role: self.role.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Get a custom claim as a string.
    pub fn claim_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }

    /// Check if the payload is past its expiry at `now`.
    ///
    /// A token is still valid at exactly `exp + leeway`.
    pub fn is_expired(&self, now: i64, leeway: i64) -> bool {
        self.exp.saturating_add(leeway) < now
    }
}

impl Principal for TokenPayload {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn role(&self) -> &str {
        &self.role
    }
}
