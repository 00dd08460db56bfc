//! Token authentication library
//!
//! Provides the stateless token core shared by the content services:
//! - Compact `header.payload.signature` encoding (HS256)
//! - Token issuance, validation and refresh
//! - Bearer-token request authentication and role checks
//!
//! Services supply their own [`UserDirectory`] and map the typed outcomes
//! to their transport.
//!
//! # Examples
//!
//! ## Issue and validate
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use auth::{Claims, DirectoryError, Identity, TokenConfig, TokenService, UserDirectory, ValidationResult};
//!
//! struct NoUsers;
//!
//! #[async_trait]
//! impl UserDirectory for NoUsers {
//!     async fn lookup_active_user(&self, _id: i64) -> Result<Option<Identity>, DirectoryError> {
//!         Ok(None)
//!     }
//!
//!     async fn verify_credentials(&self, _email: &str, _password: &str) -> Result<Option<Identity>, DirectoryError> {
//!         Ok(None)
//!     }
//! }
//!
//! let config = TokenConfig::new("secret_key_at_least_32_bytes_long!", 86_400);
//! let service = TokenService::new(&config, Arc::new(NoUsers)).unwrap();
//!
//! let token = service.issue(Claims::new(3, "editor"), service.ttl()).unwrap();
//! assert!(matches!(service.validate(&token), ValidationResult::Valid(p) if p.user_id == 3));
//! ```

pub mod clock;
pub mod directory;
pub mod gate;
pub mod jwt;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use directory::DirectoryError;
pub use directory::Identity;
pub use directory::Principal;
pub use directory::UserDirectory;
pub use gate::bearer_token;
pub use gate::require_role;
pub use gate::AuthGate;
pub use gate::Authentication;
pub use jwt::Claims;
pub use jwt::InvalidReason;
pub use jwt::RefreshError;
pub use jwt::TokenConfig;
pub use jwt::TokenError;
pub use jwt::TokenPayload;
pub use jwt::TokenService;
pub use jwt::ValidationResult;
