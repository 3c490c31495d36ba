//! Auth routes for login, registration and logout

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use super::{CONNECT_ERROR, LOGIN_PATH, USERS_PATH};
use crate::relay::RelayError;
use crate::server::AppState;
use crate::session::{NoticeLevel, Session, SessionError};
use crate::upstream::models::LoginRequest;
use crate::upstream::{ApiError, Operation};
use crate::views::{Page, View};

const MISSING_TOKEN: &str = "Login failed: no access token was received.";

/// Notice shown when login or registration fails.
fn failure_message(operation: Operation, err: &ApiError) -> String {
    match err {
        ApiError::Rejected { message, .. } => message.clone(),
        ApiError::Transport(_) => CONNECT_ERROR.to_string(),
        ApiError::Protocol(_) if operation == Operation::Login => MISSING_TOKEN.to_string(),
        ApiError::Protocol(_) | ApiError::Unauthorized => operation.default_message().to_string(),
    }
}

pub async fn login_page(session: Session) -> Result<Page, SessionError> {
    Page::render(&session, View::Login).await
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginRequest>,
) -> Result<Response, SessionError> {
    match state.relay.login(&session, &form).await {
        Ok(()) => {
            session.flash(NoticeLevel::Success, "Login successful!").await?;
            Ok(Redirect::to(USERS_PATH).into_response())
        }
        Err(RelayError::Session(e)) => Err(e),
        Err(RelayError::Api(e)) => {
            session
                .flash(NoticeLevel::Error, failure_message(Operation::Login, &e))
                .await?;
            Ok(Page::render(&session, View::Login).await?.into_response())
        }
    }
}

pub async fn register_page(session: Session) -> Result<Page, SessionError> {
    Page::render(&session, View::Register).await
}

pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginRequest>,
) -> Result<Response, SessionError> {
    match state.relay.register(&form).await {
        Ok(()) => {
            session
                .flash(NoticeLevel::Success, "Registration successful! Please log in.")
                .await?;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(e) => {
            session
                .flash(NoticeLevel::Error, failure_message(Operation::Register, &e))
                .await?;
            Ok(Page::render(&session, View::Register).await?.into_response())
        }
    }
}

pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, SessionError> {
    state.relay.logout(&session).await?;
    session
        .flash(NoticeLevel::Success, "You have been logged out.")
        .await?;
    Ok(Redirect::to(LOGIN_PATH))
}
