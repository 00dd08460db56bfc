use std::sync::Arc;

use async_trait::async_trait;
use auth::jwt::TokenCodec;
use auth::TokenService;
use auth::UserDirectory;
use auth::ValidationResult;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RefreshedToken;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionServicePort;

/// Domain service implementation for session operations.
///
/// Coordinates the user directory and the token core.
pub struct SessionService<D>
where
    D: UserDirectory + ?Sized,
{
    directory: Arc<D>,
    tokens: Arc<TokenService<D>>,
}

impl<D> SessionService<D>
where
    D: UserDirectory + ?Sized,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Credential and identity source
    /// * `tokens` - Token core sharing the same directory
    pub fn new(directory: Arc<D>, tokens: Arc<TokenService<D>>) -> Self {
        Self { directory, tokens }
    }

    fn refreshed(&self, access_token: String) -> Result<RefreshedToken, SessionError> {
        let payload = TokenCodec::decode(&access_token)
            .and_then(|segments| TokenCodec::decode_payload(segments.payload))
            .map_err(|e| SessionError::Token(e.to_string()))?;

        Ok(RefreshedToken {
            access_token,
            expires_in: self.tokens.ttl(),
            payload,
        })
    }
}

#[async_trait]
impl<D> SessionServicePort for SessionService<D>
where
    D: UserDirectory + ?Sized,
{
    async fn login(&self, command: LoginCommand) -> Result<Session, SessionError> {
        let identity = self
            .directory
            .verify_credentials(command.email.as_str(), &command.password)
            .await
            .map_err(|e| SessionError::Directory(e.to_string()))?
            .ok_or_else(|| {
                tracing::info!(email = %command.email.as_str(), "Login rejected");
                SessionError::InvalidCredentials
            })?;

        let access_token = self
            .tokens
            .issue_for(&identity)
            .map_err(|e| SessionError::Token(e.to_string()))?;

        tracing::info!(user_id = identity.id, role = %identity.role, "Session opened");

        Ok(Session {
            user: identity,
            access_token,
            expires_in: self.tokens.ttl(),
        })
    }

    async fn refresh(&self, token: &str) -> Result<RefreshedToken, SessionError> {
        match self.tokens.validate(token) {
            ValidationResult::Valid(payload) | ValidationResult::Expired(payload) => {
                self.refresh_user(payload.user_id).await
            }
            ValidationResult::Invalid(reason) => Err(SessionError::InvalidToken(reason)),
        }
    }

    async fn refresh_user(&self, user_id: i64) -> Result<RefreshedToken, SessionError> {
        let access_token = self.tokens.refresh(user_id).await?;
        self.refreshed(access_token)
    }
}

#[cfg(test)]
mod tests {
    use auth::Claims;
    use auth::DirectoryError;
    use auth::Identity;
    use auth::InvalidReason;
    use auth::TokenConfig;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::session::models::EmailAddress;

    const SECRET: &str = "session_test_secret_at_least_32_bytes";

    mock! {
        pub TestDirectory {}

        #[async_trait]
        impl UserDirectory for TestDirectory {
            async fn lookup_active_user(&self, id: i64) -> Result<Option<Identity>, DirectoryError>;
            async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<Identity>, DirectoryError>;
        }
    }

    fn editor() -> Identity {
        Identity {
            id: 3,
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            role: "editor".to_string(),
        }
    }

    fn service(directory: MockTestDirectory) -> SessionService<MockTestDirectory> {
        let directory = Arc::new(directory);
        let tokens = TokenService::new(&TokenConfig::new(SECRET, 3600), Arc::clone(&directory))
            .expect("Failed to create token service");
        SessionService::new(directory, Arc::new(tokens))
    }

    fn login_command(password: &str) -> LoginCommand {
        LoginCommand::new(
            EmailAddress::new("grace@example.com".to_string()).unwrap(),
            password.to_string(),
        )
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut directory = MockTestDirectory::new();
        directory
            .expect_verify_credentials()
            .with(eq("grace@example.com"), eq("pass_word!"))
            .times(1)
            .returning(|_, _| Ok(Some(editor())));

        let service = service(directory);
        let session = service.login(login_command("pass_word!")).await.unwrap();

        assert_eq!(session.user, editor());
        assert_eq!(session.expires_in, 3600);
        match service.tokens.validate(&session.access_token) {
            ValidationResult::Valid(payload) => {
                assert_eq!(payload.user_id, 3);
                assert_eq!(payload.role, "editor");
            }
            other => panic!("Expected Valid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mut directory = MockTestDirectory::new();
        directory
            .expect_verify_credentials()
            .times(1)
            .returning(|_, _| Ok(None));

        let result = service(directory).login(login_command("wrong")).await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_directory_failure() {
        let mut directory = MockTestDirectory::new();
        directory
            .expect_verify_credentials()
            .times(1)
            .returning(|_, _| Err(DirectoryError::Unavailable("timeout".to_string())));

        let result = service(directory).login(login_command("pass_word!")).await;
        assert!(matches!(result, Err(SessionError::Directory(_))));
    }

    #[tokio::test]
    async fn test_refresh_expired_token() {
        let mut directory = MockTestDirectory::new();
        directory
            .expect_lookup_active_user()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(Some(editor())));

        let service = service(directory);
        let expired = service.tokens.issue(Claims::new(3, "author"), -10).unwrap();

        let refreshed = service.refresh(&expired).await.unwrap();
        assert_eq!(refreshed.payload.user_id, 3);
        assert_eq!(refreshed.payload.role, "editor");
        assert_eq!(refreshed.expires_in, 3600);
        assert!(service.tokens.validate(&refreshed.access_token).is_valid());
    }

    #[tokio::test]
    async fn test_refresh_rejects_tampered_token() {
        let service = service(MockTestDirectory::new());
        let token = service.tokens.issue(Claims::new(3, "editor"), 60).unwrap();
        let tampered = format!("{}x", token);

        let result = service.refresh(&tampered).await;
        assert!(matches!(
            result,
            Err(SessionError::InvalidToken(InvalidReason::BadSignature))
        ));
    }

    #[tokio::test]
    async fn test_refresh_for_deactivated_user() {
        let mut directory = MockTestDirectory::new();
        directory
            .expect_lookup_active_user()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(directory);
        let token = service.tokens.issue(Claims::new(3, "editor"), 60).unwrap();

        let result = service.refresh(&token).await;
        assert!(matches!(result, Err(SessionError::UserNotFound(3))));
    }
}
