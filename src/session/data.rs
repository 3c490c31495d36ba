//! Session keys and the notice payload.

use serde::{Deserialize, Serialize};

/// Key holding the bearer credential. Its presence is the only
/// authorization signal; there is no separate "logged in" flag.
pub const TOKEN_KEY: &str = "token";

/// Key holding the queue of pending notices.
pub const NOTICES_KEY: &str = "notices";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}
