//! Bearer credential issued by the upstream API on login.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of characters shown by [`Credential::preview`].
const PREVIEW_CHARS: usize = 20;

/// Opaque bearer token. Expiry is known only to the issuer, so the only
/// signal this service ever gets is a 401 on a protected call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Leading characters of the token followed by an ellipsis.
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
