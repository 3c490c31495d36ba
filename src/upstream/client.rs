//! HTTP client for the upstream authentication and data API.
//!
//! Every operation is a single request with a bounded timeout. Nothing is
//! retried: whatever the first attempt produced is reported to the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{ErrorBody, LoginRequest, RawAppliance, RawUser, TokenResponse};
use super::ApiError;
use crate::credential::Credential;

/// Upstream calls this frontend knows how to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    ListUsers,
    ListAppliances,
}

impl Operation {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Login => "users/login",
            Operation::Register => "users/register",
            Operation::ListUsers => "users/",
            Operation::ListAppliances => "electrodomesticos/",
        }
    }

    /// The only status treated as success.
    pub fn success_status(self) -> StatusCode {
        match self {
            Operation::Register => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    /// Message used when a rejection carries no `message` field.
    pub fn default_message(self) -> &'static str {
        match self {
            Operation::Login => "Login failed.",
            Operation::Register => "Registration failed.",
            Operation::ListUsers => "Could not load users.",
            Operation::ListAppliances => "Could not load appliances.",
        }
    }

    /// Bearer-authenticated operations report 401 as [`ApiError::Unauthorized`].
    /// For login and registration a 401 is an ordinary rejection.
    fn uses_bearer(self) -> bool {
        matches!(self, Operation::ListUsers | Operation::ListAppliances)
    }

    fn label(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::ListUsers => "list_users",
            Operation::ListAppliances => "list_appliances",
        }
    }
}

/// The upstream API as seen by the credential relay.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError>;

    async fn register(&self, request: &LoginRequest) -> Result<(), ApiError>;

    async fn list_users(&self, credential: &Credential) -> Result<Vec<RawUser>, ApiError>;

    async fn list_appliances(
        &self,
        credential: &Credential,
    ) -> Result<Vec<RawAppliance>, ApiError>;
}

/// reqwest-backed [`UpstreamApi`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.path())
    }

    /// Sends the request and returns the body of a successful response.
    async fn dispatch(&self, operation: Operation, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Upstream {} request failed: {}", operation.label(), e);
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(operation = operation.label(), status = status.as_u16(), "Upstream responded");

        if status == operation.success_status() {
            return Ok(response.text().await?);
        }

        if status == StatusCode::UNAUTHORIZED && operation.uses_bearer() {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| operation.default_message().to_string());

        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: DeserializeOwned>(operation: Operation, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body)
            .map_err(|e| ApiError::Protocol(format!("malformed {} response: {}", operation.label(), e)))
    }
}

#[async_trait]
impl UpstreamApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        let operation = Operation::Login;
        let builder = self.client.post(self.endpoint(operation)).json(request);
        let body = self.dispatch(operation, builder).await?;
        Self::decode(operation, &body)
    }

    async fn register(&self, request: &LoginRequest) -> Result<(), ApiError> {
        let operation = Operation::Register;
        let builder = self.client.post(self.endpoint(operation)).json(request);
        self.dispatch(operation, builder).await.map(|_| ())
    }

    async fn list_users(&self, credential: &Credential) -> Result<Vec<RawUser>, ApiError> {
        let operation = Operation::ListUsers;
        let builder = self
            .client
            .get(self.endpoint(operation))
            .bearer_auth(credential.expose());
        let body = self.dispatch(operation, builder).await?;
        Self::decode(operation, &body)
    }

    async fn list_appliances(
        &self,
        credential: &Credential,
    ) -> Result<Vec<RawAppliance>, ApiError> {
        let operation = Operation::ListAppliances;
        let builder = self
            .client
            .get(self.endpoint(operation))
            .bearer_auth(credential.expose());
        let body = self.dispatch(operation, builder).await?;
        Self::decode(operation, &body)
    }
}
