pub mod claims;
pub mod codec;
pub mod errors;
pub mod service;
pub mod signer;

pub use claims::Claims;
pub use claims::Header;
pub use claims::TokenPayload;
pub use codec::TokenCodec;
pub use errors::InvalidReason;
pub use errors::RefreshError;
pub use errors::TokenError;
pub use service::TokenConfig;
pub use service::TokenService;
pub use service::ValidationResult;
pub use signer::Signer;
