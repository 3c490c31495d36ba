//! Session diagnostics, mounted only when debug routes are enabled.

use axum::Json;
use serde::Serialize;

use crate::session::{Session, SessionError};

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub has_session: bool,
    pub has_token: bool,
    pub token_preview: Option<String>,
    pub session_id: Option<String>,
}

/// Diagnostic view of the caller's session. Never shows the full token.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/debug/session`
pub async fn session_report(session: Session) -> Result<Json<SessionReport>, SessionError> {
    // Loading the credential first drops an id the store no longer knows.
    let credential = session.credential().await?;
    let id = session.id();

    Ok(Json(SessionReport {
        has_session: id.is_some(),
        has_token: credential.is_some(),
        token_preview: credential.map(|c| c.preview()),
        session_id: id.map(|id| id.to_string()),
    }))
}
