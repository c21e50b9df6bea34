//! Access credentials for the object store.

use serde::{Deserialize, Serialize};

/// Static access credentials used to sign live requests.
///
/// The secret key is never serialized and never printed by `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key identifier.
    pub access_key: String,

    /// Secret access key.
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Optional session token for temporary credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Credentials {
    /// Creates new credentials from an access key and secret key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Sets a session token for temporary credentials.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    /// Returns the access key.
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Returns the secret key.
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns the session token if available.
    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Returns a masked version of the access key for logging.
    ///
    /// This shows only the first 4 characters followed by asterisks.
    pub fn access_key_masked(&self) -> String {
        if self.access_key.chars().count() <= 4 {
            "*".repeat(self.access_key.chars().count())
        } else {
            let head: String = self.access_key.chars().take(4).collect();
            format!("{head}***")
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key_masked())
            .field("has_session_token", &self.session_token.is_some())
            .finish_non_exhaustive()
    }
}
