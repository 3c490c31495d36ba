//! Scripted in-memory upstream and session helpers for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::credential::Credential;
use crate::session::{MemoryStore, Session};
use crate::upstream::models::{LoginRequest, RawAppliance, RawUser, TokenResponse};
use crate::upstream::{ApiError, UpstreamApi};

/// Returns canned results and records what it was asked.
pub struct ScriptedApi {
    login: Mutex<Result<TokenResponse, ApiError>>,
    register: Mutex<Result<(), ApiError>>,
    users: Mutex<Result<Vec<RawUser>, ApiError>>,
    users_delay: Mutex<Duration>,
    appliances: Mutex<Result<Vec<RawAppliance>, ApiError>>,
    calls: AtomicUsize,
    bearer_tokens: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            login: Mutex::new(Ok(TokenResponse {
                access_token: Some("token-abc".to_string()),
            })),
            register: Mutex::new(Ok(())),
            users: Mutex::new(Ok(Vec::new())),
            users_delay: Mutex::new(Duration::ZERO),
            appliances: Mutex::new(Ok(Vec::new())),
            calls: AtomicUsize::new(0),
            bearer_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login(self, result: Result<TokenResponse, ApiError>) -> Self {
        *self.login.lock() = result;
        self
    }

    pub fn with_register(self, result: Result<(), ApiError>) -> Self {
        *self.register.lock() = result;
        self
    }

    pub fn with_users(self, result: Result<Vec<RawUser>, ApiError>) -> Self {
        self.set_users(result);
        self
    }

    pub fn with_appliances(self, result: Result<Vec<RawAppliance>, ApiError>) -> Self {
        *self.appliances.lock() = result;
        self
    }

    /// Changes the users result mid-test.
    pub fn set_users(&self, result: Result<Vec<RawUser>, ApiError>) {
        *self.users.lock() = result;
    }

    /// Makes later users calls wait this long before answering.
    pub fn set_users_delay(&self, delay: Duration) {
        *self.users_delay.lock() = delay;
    }

    /// Total number of upstream calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Bearer tokens seen by protected calls, in order.
    pub fn bearer_tokens(&self) -> Vec<String> {
        self.bearer_tokens.lock().clone()
    }

    fn record(&self, credential: Option<&Credential>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(credential) = credential {
            self.bearer_tokens.lock().push(credential.expose().to_string());
        }
    }
}

#[async_trait]
impl UpstreamApi for ScriptedApi {
    async fn login(&self, _request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.record(None);
        self.login.lock().clone()
    }

    async fn register(&self, _request: &LoginRequest) -> Result<(), ApiError> {
        self.record(None);
        self.register.lock().clone()
    }

    async fn list_users(&self, credential: &Credential) -> Result<Vec<RawUser>, ApiError> {
        self.record(Some(credential));
        let delay = *self.users_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.users.lock().clone()
    }

    async fn list_appliances(
        &self,
        credential: &Credential,
    ) -> Result<Vec<RawAppliance>, ApiError> {
        self.record(Some(credential));
        self.appliances.lock().clone()
    }
}

/// A session that is not attached to any request.
pub fn detached_session() -> Session {
    Session::new(tower_sessions::Session::new(
        None,
        Arc::new(MemoryStore::new()),
        None,
    ))
}

/// A detached session already holding `token`.
pub async fn signed_in(token: &str) -> Session {
    let session = detached_session();
    session
        .authenticate(Credential::new(token))
        .await
        .unwrap();
    session
}
