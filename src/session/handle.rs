//! Request-scoped session handle.
//!
//! Thin typed helpers over [`tower_sessions::Session`]: the credential slot
//! and the notice queue.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tower_sessions::session::Id;
use tracing::error;

use super::data::{NOTICES_KEY, Notice, NoticeLevel, TOKEN_KEY};
use crate::credential::Credential;
use crate::views::Page;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        error!("Session failure: {}", self);
        Page::internal_error().into_response()
    }
}

/// The current browser's session. Clones share the same state.
#[derive(Clone, Debug)]
pub struct Session {
    inner: tower_sessions::Session,
}

impl Session {
    pub fn new(inner: tower_sessions::Session) -> Self {
        Self { inner }
    }

    /// Identifier of the stored record, if there is one.
    pub fn id(&self) -> Option<Id> {
        self.inner.id()
    }

    pub async fn credential(&self) -> Result<Option<Credential>, SessionError> {
        Ok(self.inner.get(TOKEN_KEY).await?)
    }

    /// Stores the credential under a fresh session id.
    pub async fn authenticate(&self, credential: Credential) -> Result<(), SessionError> {
        self.inner.cycle_id().await?;
        self.inner.insert(TOKEN_KEY, credential).await?;
        Ok(())
    }

    /// Drops everything, credential and pending notices included, and
    /// deletes the stored record.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.inner.flush().await?;
        Ok(())
    }

    pub async fn flash(
        &self,
        level: NoticeLevel,
        message: impl Into<String>,
    ) -> Result<(), SessionError> {
        let mut notices: Vec<Notice> = self.inner.get(NOTICES_KEY).await?.unwrap_or_default();
        notices.push(Notice {
            level,
            message: message.into(),
        });
        self.inner.insert(NOTICES_KEY, notices).await?;
        Ok(())
    }

    /// Pending notices, removed from the session.
    pub async fn take_notices(&self) -> Result<Vec<Notice>, SessionError> {
        Ok(self.inner.remove(NOTICES_KEY).await?.unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map(Self::new)
    }
}
