use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::codec::signing_input;
use super::errors::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer over `header.payload`.
///
/// Keyed once at construction; the secret itself is not retained.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    /// Create a signer for a secret key.
    ///
    /// # Errors
    /// * `InvalidConfig` - Secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidConfig(
                "signing secret must not be empty".to_string(),
            ));
        }

        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| TokenError::InvalidConfig(e.to_string()))?;

        Ok(Self { mac })
    }

    /// Compute the base64url signature segment.
    pub fn sign(&self, header: &str, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(signing_input(header, payload).as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Check a signature segment in constant time.
    pub fn verify(&self, header: &str, payload: &str, signature: &str) -> bool {
        let expected = self.sign(header, payload);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("algorithm", &"HS256").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-signing-at-least-32-bytes";
    const HEADER: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9";
    const PAYLOAD: &str = "eyJ1c2VyX2lkIjozfQ";

    #[test]
    fn test_sign_known_vector() {
        let signer = Signer::new(SECRET).unwrap();

        assert_eq!(
            signer.sign(HEADER, PAYLOAD),
            "Vopoc8w8VNvJ1dLVsFgrbNmEBZlv0-8EIGUwgKWjj4w"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = Signer::new(SECRET).unwrap();
        assert_eq!(signer.sign(HEADER, PAYLOAD), signer.sign(HEADER, PAYLOAD));
    }

    #[test]
    fn test_verify() {
        let signer = Signer::new(SECRET).unwrap();
        let signature = signer.sign(HEADER, PAYLOAD);

        assert!(signer.verify(HEADER, PAYLOAD, &signature));
        assert!(!signer.verify(HEADER, "eyJ1c2VyX2lkIjo0fQ", &signature));
        assert!(!signer.verify(HEADER, PAYLOAD, &signature[..signature.len() - 1]));
        assert!(!signer.verify(HEADER, PAYLOAD, ""));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let signer1 = Signer::new(b"secret1_at_least_32_bytes_long_key!").unwrap();
        let signer2 = Signer::new(b"secret2_at_least_32_bytes_long_key!").unwrap();

        let signature = signer1.sign(HEADER, PAYLOAD);
        assert!(!signer2.verify(HEADER, PAYLOAD, &signature));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            Signer::new(b""),
            Err(TokenError::InvalidConfig(_))
        ));
    }
}
