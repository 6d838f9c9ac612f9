use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenCodec;
use ledger_service::domain::entry::errors::EntryError;
use ledger_service::domain::entry::models::EntryFilter;
use ledger_service::domain::entry::models::EntryId;
use ledger_service::domain::entry::models::EntryKind;
use ledger_service::domain::entry::models::EntryStatus;
use ledger_service::domain::entry::models::LedgerEntry;
use ledger_service::domain::entry::models::NewLedgerEntry;
use ledger_service::domain::entry::ports::EntryRepository;
use ledger_service::domain::entry::service::EntryService;
use ledger_service::domain::user::directory::UserDirectory;
use ledger_service::domain::user::errors::UserError;
use ledger_service::domain::user::models::NewUser;
use ledger_service::domain::user::models::User;
use ledger_service::domain::user::models::UserId;
use ledger_service::domain::user::ports::UserRepository;
use ledger_service::domain::user::service::UserService;
use ledger_service::inbound::http::router::create_router;
use rust_decimal::Decimal;
use serde_json::json;
use serde_json::Value;
use tokio::sync::Mutex;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_EXPIRATION_MINUTES: i64 = 30;

/// Test application that spawns a real server over in-memory repositories
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let entry_repository = Arc::new(InMemoryEntryRepository::default());

        let token_codec = Arc::new(
            TokenCodec::new(JWT_SECRET, JWT_EXPIRATION_MINUTES)
                .expect("Failed to create token codec"),
        );

        let router = create_router(
            Arc::new(UserService::new(Arc::clone(&user_repository))),
            Arc::new(EntryService::new(entry_repository)),
            Arc::new(UserDirectory::new(user_repository)),
            Arc::clone(&token_codec),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_codec,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return its id
    pub async fn register(&self, name: &str, email: &str, password: &str) -> i64 {
        let response = self
            .post("/api/users")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing user id")
    }

    /// Log in and return the issued bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/users/authenticate")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Register a user, log in, and return its id with a token
    pub async fn signed_in(&self, name: &str, email: &str) -> (i64, String) {
        let id = self.register(name, email, "s3cret").await;
        let token = self.login(email, "s3cret").await;
        (id, token)
    }

    /// Record an entry and return its JSON representation
    pub async fn create_entry(&self, token: &str, entry: Value) -> Value {
        let response = self
            .post_authenticated("/api/entries", token)
            .json(&entry)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let user = User {
            id: UserId(users.len() as i64 + 1),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError> {
        let users = self.users.lock().await;
        Ok(users.iter().any(|u| u.email.as_str() == email))
    }
}

#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: Mutex<Vec<LedgerEntry>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn create(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, EntryError> {
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;

        let entry = LedgerEntry {
            id: EntryId(*next_id),
            user_id: entry.user_id,
            description: entry.draft.description,
            month: entry.draft.month,
            year: entry.draft.year,
            amount: entry.draft.amount,
            kind: entry.draft.kind,
            status: entry.status,
            created_at: entry.created_at,
        };
        self.entries.lock().await.push(entry.clone());

        Ok(entry)
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<LedgerEntry>, EntryError> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn update(&self, entry: &LedgerEntry) -> Result<LedgerEntry, EntryError> {
        let mut entries = self.entries.lock().await;
        let stored = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(EntryError::NotFound(entry.id.to_string()))?;
        *stored = entry.clone();

        Ok(entry.clone())
    }

    async fn delete(&self, id: EntryId) -> Result<(), EntryError> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            return Err(EntryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn search(&self, filter: &EntryFilter) -> Result<Vec<LedgerEntry>, EntryError> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn sum_amount(
        &self,
        user_id: UserId,
        kind: EntryKind,
        status: EntryStatus,
    ) -> Result<Decimal, EntryError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|e| e.user_id == user_id && e.kind == kind && e.status == status)
            .map(|e| e.amount)
            .sum())
    }
}
