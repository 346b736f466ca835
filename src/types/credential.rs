//! Session credential

use secrecy::{ExposeSecret, SecretString};

/// Session token used to authenticate one pipeline run.
///
/// The token is kept in a [`SecretString`] and never printed.
#[derive(Clone)]
pub struct Credential {
    token: SecretString,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Expose the raw token for building request headers.
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.token.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .finish()
    }
}
