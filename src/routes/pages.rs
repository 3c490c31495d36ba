//! Index and the two protected listing pages.

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

use super::{CONNECT_ERROR, LOGIN_PATH, USERS_PATH};
use crate::relay::{Guard, RelayError, guard};
use crate::server::AppState;
use crate::session::{NoticeLevel, Session, SessionError};
use crate::upstream::ApiError;
use crate::views::{Page, View};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const LOGIN_REQUIRED: &str = "Please log in to access this page.";
const UNEXPECTED_ERROR: &str = "Unexpected error. Please try again.";

pub async fn index(session: Session) -> Result<Redirect, SessionError> {
    Ok(match guard(&session).await? {
        Guard::Proceed(_) => Redirect::to(USERS_PATH),
        Guard::RedirectToLogin => Redirect::to(LOGIN_PATH),
    })
}

pub async fn users(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, SessionError> {
    info!("Users page accessed");
    let Guard::Proceed(credential) = guard(&session).await? else {
        return redirect_to_login(&session).await;
    };

    let result = state.relay.list_users(&session, &credential).await;
    listing(
        &session,
        result,
        "Could not load users. Please try again.",
        |users| View::Users { users },
    )
    .await
}

pub async fn appliances(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, SessionError> {
    info!("Appliances page accessed");
    let Guard::Proceed(credential) = guard(&session).await? else {
        return redirect_to_login(&session).await;
    };

    let result = state.relay.list_appliances(&session, &credential).await;
    listing(
        &session,
        result,
        "Could not load appliances. Please try again.",
        |electrodomesticos| View::Appliances { electrodomesticos },
    )
    .await
}

async fn redirect_to_login(session: &Session) -> Result<Response, SessionError> {
    info!("Protected page requested without a credential");
    session.flash(NoticeLevel::Warning, LOGIN_REQUIRED).await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// Turns a listing outcome into a page. Failures other than 401 still
/// render the page, with no rows.
async fn listing<T>(
    session: &Session,
    result: Result<Vec<T>, RelayError>,
    rejected: &str,
    view: impl FnOnce(Vec<T>) -> View,
) -> Result<Response, SessionError> {
    let notice = match result {
        Ok(records) => return Ok(Page::render(session, view(records)).await?.into_response()),
        Err(RelayError::Session(e)) => return Err(e),
        Err(RelayError::Api(ApiError::Unauthorized)) => {
            session.flash(NoticeLevel::Warning, SESSION_EXPIRED).await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
        Err(RelayError::Api(ApiError::Rejected { .. })) => rejected,
        Err(RelayError::Api(ApiError::Transport(_))) => CONNECT_ERROR,
        Err(RelayError::Api(ApiError::Protocol(_))) => UNEXPECTED_ERROR,
    };

    session.flash(NoticeLevel::Error, notice).await?;
    Ok(Page::render(session, view(Vec::new())).await?.into_response())
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> Page {
    warn!("Page not found: {}", uri);
    Page::not_found()
}
