//! Session Middleware
//!
//! Cookie and expiry policy for the `tower-sessions` manager layer.

use time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, cookie::SameSite};

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "session";

/// Upper bound on the session lifetime, one year.
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Builds the layer that loads sessions before the handler and saves them
/// afterwards.
///
/// Every request with a live session is saved, so the expiry slides from
/// the last request. Sessions left empty are deleted and their cookie
/// removed.
pub fn session_layer<S>(store: S, ttl_secs: u64, secure: bool) -> SessionManagerLayer<S>
where
    S: SessionStore,
{
    let ttl = Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(secure)
        .with_path("/")
        .with_expiry(Expiry::OnInactivity(ttl))
        .with_always_save(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::session::{MemoryStore, NoticeLevel, Session};
    use axum::{
        Router,
        body::Body,
        http::{HeaderMap, Request, StatusCode, header},
        response::Response,
        routing::get,
    };
    use time::OffsetDateTime;
    use tower::ServiceExt;
    use tower_sessions::session::Id;

    fn app(store: MemoryStore) -> Router {
        Router::new()
            .route("/noop", get(|| async { "ok" }))
            .route(
                "/login",
                get(|session: Session| async move {
                    session.authenticate(Credential::new("tok")).await?;
                    Ok::<_, crate::session::SessionError>("ok")
                }),
            )
            .route(
                "/flash",
                get(|session: Session| async move {
                    session.flash(NoticeLevel::Success, "hi").await?;
                    Ok::<_, crate::session::SessionError>("ok")
                }),
            )
            .route(
                "/whoami",
                get(|session: Session| async move {
                    let credential = session.credential().await?;
                    Ok::<_, crate::session::SessionError>(
                        credential
                            .map(|c| c.expose().to_string())
                            .unwrap_or_default(),
                    )
                }),
            )
            .route(
                "/clear",
                get(|session: Session| async move {
                    session.clear().await?;
                    Ok::<_, crate::session::SessionError>("ok")
                }),
            )
            .layer(session_layer(store, 3600, false))
    }

    async fn get_with_cookie(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn session_cookie(headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .map(str::to_string)
    }

    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap_or_default().to_string()
    }

    fn session_id(pair: &str) -> Id {
        pair.trim_start_matches("session=").parse().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn anonymous_request_sets_no_cookie() {
        let app = app(MemoryStore::new());
        let response = get_with_cookie(&app, "/noop", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(response.headers()).is_none());
    }

    #[tokio::test]
    async fn authenticated_session_round_trips_through_cookie() {
        let app = app(MemoryStore::new());

        let response = get_with_cookie(&app, "/login", None).await;
        let set_cookie = session_cookie(response.headers()).unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Max-Age=3600"));

        let response = get_with_cookie(&app, "/whoami", Some(&cookie_pair(&set_cookie))).await;
        assert_eq!(body_text(response).await, "tok");
    }

    #[tokio::test]
    async fn flash_creates_a_session() {
        let store = MemoryStore::new();
        let app = app(store.clone());
        let response = get_with_cookie(&app, "/flash", None).await;

        assert!(session_cookie(response.headers()).is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn login_rotates_the_session_id() {
        let store = MemoryStore::new();
        let app = app(store.clone());

        let response = get_with_cookie(&app, "/flash", None).await;
        let before = cookie_pair(&session_cookie(response.headers()).unwrap());

        let response = get_with_cookie(&app, "/login", Some(&before)).await;
        let after = cookie_pair(&session_cookie(response.headers()).unwrap());

        assert_ne!(before, after);
        assert!(store.expiry_of(&session_id(&before)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn every_request_slides_the_expiry() {
        let store = MemoryStore::new();
        let app = app(store.clone());

        let response = get_with_cookie(&app, "/login", None).await;
        let pair = cookie_pair(&session_cookie(response.headers()).unwrap());
        let id = session_id(&pair);

        let soon = OffsetDateTime::now_utc() + Duration::seconds(10);
        store.set_expiry(&id, soon);

        let response = get_with_cookie(&app, "/whoami", Some(&pair)).await;
        assert_eq!(body_text(response).await, "tok");

        let expiry = store.expiry_of(&id).unwrap();
        assert!(expiry > OffsetDateTime::now_utc() + Duration::minutes(59));
    }

    #[tokio::test]
    async fn clearing_removes_record_and_expires_cookie() {
        let store = MemoryStore::new();
        let app = app(store.clone());

        let response = get_with_cookie(&app, "/login", None).await;
        let pair = cookie_pair(&session_cookie(response.headers()).unwrap());

        let response = get_with_cookie(&app, "/clear", Some(&pair)).await;
        let removal = session_cookie(response.headers()).unwrap();
        assert!(removal.contains("Max-Age=0"));
        assert!(store.expiry_of(&session_id(&pair)).is_none());

        let response = get_with_cookie(&app, "/whoami", Some(&pair)).await;
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn garbage_cookie_is_treated_as_anonymous() {
        let app = app(MemoryStore::new());
        let response = get_with_cookie(&app, "/whoami", Some("session=not-an-id")).await;

        assert_eq!(response.status(), StatusCode::OK);
        // Nothing is stored for it, so the stale cookie is expired.
        assert!(session_cookie(response.headers()).unwrap().contains("Max-Age=0"));
    }
}
