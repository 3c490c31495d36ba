//! # Views
//!
//! Boundary to the rendering collaborator. Handlers pick a [`View`] and
//! the pending notices; the page goes out as a JSON view model naming the
//! template to render.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::session::{Notice, Session, SessionError};
use crate::upstream::models::{ApplianceRecord, UserRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum View {
    Login,
    Register,
    Users { users: Vec<UserRecord> },
    Appliances { electrodomesticos: Vec<ApplianceRecord> },
    NotFound,
    InternalError,
}

impl View {
    pub fn template(&self) -> &'static str {
        match self {
            View::Login => "login.html",
            View::Register => "register.html",
            View::Users { .. } => "users.html",
            View::Appliances { .. } => "electrodomesticos.html",
            View::NotFound => "404.html",
            View::InternalError => "500.html",
        }
    }

    fn context(&self) -> serde_json::Value {
        match self {
            View::Users { .. } | View::Appliances { .. } => json!(self),
            _ => json!({}),
        }
    }
}

/// A view plus the notices to show with it.
#[derive(Debug)]
pub struct Page {
    pub view: View,
    pub notices: Vec<Notice>,
    pub status: StatusCode,
}

impl Page {
    /// Renders `view`, consuming the session's pending notices.
    pub async fn render(session: &Session, view: View) -> Result<Self, SessionError> {
        Ok(Self {
            view,
            notices: session.take_notices().await?,
            status: StatusCode::OK,
        })
    }

    pub fn not_found() -> Self {
        Self {
            view: View::NotFound,
            notices: Vec::new(),
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn internal_error() -> Self {
        Self {
            view: View::InternalError,
            notices: Vec::new(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let body = json!({
            "template": self.view.template(),
            "notices": self.notices,
            "context": self.view.context(),
        });
        (self.status, Json(body)).into_response()
    }
}
