use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use tokio::sync::Mutex;
use tokio::time::Instant;
use token_service::domain::session::models::RefreshRecord;
use token_service::domain::session::models::RefreshToken;
use token_service::domain::session::models::User;
use token_service::domain::session::models::UserId;
use token_service::domain::session::service::AuthenticationService;
use token_service::inbound::http::router::create_router;
use token_service::session::errors::CredentialStoreError;
use token_service::session::errors::RefreshTokenStoreError;
use token_service::session::ports::CredentialStore;
use token_service::session::ports::RefreshTokenStore;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Authenticator,
    pub credential_store: Arc<InMemoryCredentialStore>,
    pub refresh_token_store: Arc<InMemoryRefreshTokenStore>,
}

impl TestApp {
    /// Spawn the application with the default refresh token lifetime
    pub async fn spawn() -> Self {
        Self::spawn_with_refresh_ttl(Duration::from_secs(8 * 60 * 60)).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with_refresh_ttl(refresh_ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET).expect("Invalid secret"));
        let credential_store = Arc::new(InMemoryCredentialStore::seeded(&authenticator));
        let refresh_token_store = Arc::new(InMemoryRefreshTokenStore::new(refresh_ttl));

        let auth_service = Arc::new(AuthenticationService::new(
            Arc::clone(&credential_store),
            Arc::clone(&authenticator),
            Arc::clone(&authenticator),
            Arc::clone(&refresh_token_store),
            chrono::Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
        ));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator: Authenticator::new(JWT_SECRET).expect("Invalid secret"),
            credential_store,
            refresh_token_store,
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// POST /api/v1/authenticate with the given credentials
    pub async fn authenticate(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/authenticate")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// POST /api/v1/refresh with the given refresh token
    pub async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/api/v1/refresh")
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Check an access token's signature and expiry, returning its claims
    pub fn verify_access_token(&self, token: &str) -> Claims {
        self.authenticator
            .validate_token(token)
            .expect("Access token did not verify")
    }
}

/// Credential store seeded with a fixed set of users
pub struct InMemoryCredentialStore {
    users: HashMap<String, User>,
    unavailable: AtomicBool,
}

impl InMemoryCredentialStore {
    /// - a@example.com / correct-pw (admin, Argon2id)
    /// - b@example.com / legacy-pw (user, bcrypt)
    /// - broken@example.com (malformed stored hash)
    fn seeded(authenticator: &Authenticator) -> Self {
        let users = [
            User {
                id: UserId(1),
                role: "admin".to_string(),
                name: "Alice".to_string(),
                email: "a@example.com".to_string(),
                password_hash: authenticator
                    .hash_password("correct-pw")
                    .expect("Failed to hash password"),
            },
            User {
                id: UserId(2),
                role: "user".to_string(),
                name: "Bob".to_string(),
                email: "b@example.com".to_string(),
                password_hash: bcrypt::hash("legacy-pw", 4).expect("Failed to hash password"),
            },
            User {
                id: UserId(3),
                role: "user".to_string(),
                name: "Broken".to_string(),
                email: "broken@example.com".to_string(),
                password_hash: "not-a-password-hash".to_string(),
            },
        ];

        Self {
            users: users
                .into_iter()
                .map(|user| (user.email.clone(), user))
                .collect(),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent lookup fail as if the database were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::DatabaseError(
                "connection refused by 10.0.0.5:5432".to_string(),
            ));
        }
        Ok(self.users.get(email).cloned())
    }
}

/// Refresh token store with the same expiry semantics as the Redis adapter
pub struct InMemoryRefreshTokenStore {
    entries: Mutex<HashMap<RefreshToken, (RefreshRecord, Instant)>>,
    ttl: Duration,
}

impl InMemoryRefreshTokenStore {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn issued_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn issue(&self, record: &RefreshRecord) -> Result<RefreshToken, RefreshTokenStoreError> {
        let token = RefreshToken::generate();
        let mut entries = self.entries.lock().await;

        if entries.contains_key(&token) {
            return Err(RefreshTokenStoreError::Collision);
        }
        entries.insert(token, (record.clone(), Instant::now() + self.ttl));

        Ok(token)
    }

    async fn resolve(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError> {
        let entries = self.entries.lock().await;

        Ok(entries
            .get(token)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(record, _)| record.clone()))
    }
}
