use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier as _;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use auth::DirectoryError;

/// Argon2id password hashes in PHC string format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a random salt.
    ///
    /// # Errors
    /// * `CredentialCheck` - Hashing failed
    pub fn hash(&self, password: &str) -> Result<String, DirectoryError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DirectoryError::CredentialCheck(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `CredentialCheck` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, DirectoryError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            DirectoryError::CredentialCheck(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("pass_word!").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pass_word!", &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        assert!(matches!(
            hasher.verify("pass_word!", "not-a-phc-string"),
            Err(DirectoryError::CredentialCheck(_))
        ));
    }
}
