use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::AuthGate;
use auth::DirectoryError;
use auth::Identity;
use auth::TokenConfig;
use auth::TokenService;
use auth::UserDirectory;
use content_api::domain::session::ports::SessionServicePort;
use content_api::domain::session::service::SessionService;
use content_api::inbound::http::router::create_router;

pub const SECRET: &str = "test-secret-key-for-token-signing-at-least-32-bytes";
pub const TOKEN_EXPIRY: i64 = 86_400;

struct StoredUser {
    identity: Identity,
    password: String,
    active: bool,
}

/// In-memory stand-in for the users table
#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<HashMap<i64, StoredUser>>,
    unavailable: AtomicBool,
}

impl InMemoryDirectory {
    pub fn add_user(&self, id: i64, name: &str, email: &str, role: &str, password: &str) {
        let user = StoredUser {
            identity: Identity {
                id,
                name: name.to_string(),
                email: email.to_string(),
                role: role.to_string(),
            },
            password: password.to_string(),
            active: true,
        };
        self.users.lock().unwrap().insert(id, user);
    }

    pub fn deactivate(&self, id: i64) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.active = false;
        }
    }

    pub fn set_role(&self, id: i64, role: &str) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.identity.role = role.to_string();
        }
    }

    /// Make every subsequent call fail as if the database were down
    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DirectoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable(
                "connection refused: postgres://content:hunter2@db/content".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn lookup_active_user(&self, id: i64) -> Result<Option<Identity>, DirectoryError> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users
            .get(&id)
            .filter(|user| user.active)
            .map(|user| user.identity.clone()))
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, DirectoryError> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        // Same match as `lower(email) = $1` in the Postgres directory
        Ok(users
            .values()
            .find(|user| {
                user.active
                    && user.identity.email.to_lowercase() == email
                    && user.password == password
            })
            .map(|user| user.identity.clone()))
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub directory: Arc<InMemoryDirectory>,
    pub tokens: Arc<TokenService<dyn UserDirectory>>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with(auto_refresh: bool) -> Self {
        let directory = Arc::new(InMemoryDirectory::default());
        directory.add_user(1, "Ada", "ada@example.com", "admin", "pass_word!");
        directory.add_user(3, "Grace", "grace@example.com", "editor", "pass_word!");
        directory.add_user(7, "Linus", "linus@example.com", "author", "pass_word!");

        let shared: Arc<dyn UserDirectory> = directory.clone();
        let tokens = Arc::new(
            TokenService::new(
                &TokenConfig::new(SECRET, TOKEN_EXPIRY),
                Arc::clone(&shared),
            )
            .expect("Failed to create token service"),
        );
        let session_service: Arc<dyn SessionServicePort> =
            Arc::new(SessionService::new(shared, Arc::clone(&tokens)));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(
            session_service,
            AuthGate::new(Arc::clone(&tokens)),
            auto_refresh,
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            directory,
            tokens,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Log in through the API and return the issued token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }

    /// Mint a token for a user that expired `seconds_ago` seconds ago
    pub fn expired_token(&self, user_id: i64, role: &str, seconds_ago: i64) -> String {
        self.tokens
            .issue(auth::Claims::new(user_id, role), -seconds_ago)
            .expect("Failed to issue token")
    }
}
