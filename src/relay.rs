//! # Credential Relay
//!
//! Binds the session's credential slot to the outcome of upstream calls:
//!
//! - a successful login stores the issued token and rotates the session;
//! - protected calls carry the token as a bearer credential;
//! - a 401 on a protected call clears the whole session;
//! - any other failure leaves the credential where it is.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::credential::Credential;
use crate::session::{Session, SessionError};
use crate::upstream::models::{ApplianceRecord, LoginRequest, UserRecord};
use crate::upstream::{ApiError, UpstreamApi};

/// A relay step failed either upstream or while updating the session.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Outcome of the precondition checked before any protected call.
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    Proceed(Credential),
    RedirectToLogin,
}

/// Checks for a credential without contacting upstream.
pub async fn guard(session: &Session) -> Result<Guard, SessionError> {
    Ok(match session.credential().await? {
        Some(credential) => Guard::Proceed(credential),
        None => Guard::RedirectToLogin,
    })
}

#[derive(Clone)]
pub struct CredentialRelay {
    api: Arc<dyn UpstreamApi>,
}

impl CredentialRelay {
    pub fn new(api: Arc<dyn UpstreamApi>) -> Self {
        Self { api }
    }

    /// Logs in upstream and stores the issued token in the session.
    ///
    /// A success status without a usable `access_token` is reported as
    /// [`ApiError::Protocol`] and leaves the session untouched.
    pub async fn login(
        &self,
        session: &Session,
        request: &LoginRequest,
    ) -> Result<(), RelayError> {
        info!("Login attempt for username: {}", request.username);

        let response = self.api.login(request).await.inspect_err(|e| {
            warn!("Failed login attempt for {}: {}", request.username, e);
        })?;

        let token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                error!("No access_token in login response for {}", request.username);
                ApiError::Protocol("login response carried no access_token".to_string())
            })?;

        session.authenticate(Credential::new(token)).await?;
        info!("Successful login for user: {}", request.username);
        Ok(())
    }

    /// Registers upstream. Never authenticates the session.
    pub async fn register(&self, request: &LoginRequest) -> Result<(), ApiError> {
        info!("Registration attempt for username: {}", request.username);

        self.api.register(request).await.inspect_err(|e| {
            warn!("Failed registration attempt for {}: {}", request.username, e);
        })?;

        info!("Successful registration for user: {}", request.username);
        Ok(())
    }

    pub async fn list_users(
        &self,
        session: &Session,
        credential: &Credential,
    ) -> Result<Vec<UserRecord>, RelayError> {
        let result = self.api.list_users(credential).await;
        let users: Vec<UserRecord> = settle(session, "users", result)
            .await?
            .into_iter()
            .map(UserRecord::from)
            .collect();

        info!("Retrieved {} users", users.len());
        Ok(users)
    }

    pub async fn list_appliances(
        &self,
        session: &Session,
        credential: &Credential,
    ) -> Result<Vec<ApplianceRecord>, RelayError> {
        let result = self.api.list_appliances(credential).await;
        let appliances: Vec<ApplianceRecord> = settle(session, "appliances", result)
            .await?
            .into_iter()
            .map(ApplianceRecord::from)
            .collect();

        info!("Retrieved {} appliances", appliances.len());
        Ok(appliances)
    }

    /// Unconditionally forgets the session.
    pub async fn logout(&self, session: &Session) -> Result<(), SessionError> {
        if session.credential().await?.is_some() {
            info!("User logged out");
        }
        session.clear().await
    }
}

/// Applies the session side effects of a protected call's outcome.
async fn settle<T>(
    session: &Session,
    resource: &str,
    result: Result<T, ApiError>,
) -> Result<T, RelayError> {
    match result {
        Ok(value) => Ok(value),
        Err(ApiError::Unauthorized) => {
            warn!("Token expired or invalid while fetching {}, clearing session", resource);
            session.clear().await?;
            Err(ApiError::Unauthorized.into())
        }
        Err(e) => {
            error!("Upstream error when fetching {}: {}", resource, e);
            Err(e.into())
        }
    }
}
