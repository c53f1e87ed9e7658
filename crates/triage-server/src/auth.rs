//! HTTP Basic Auth for the reviewer endpoints.
//!
//! Any username is accepted; only the password is compared against the
//! configured admin password. The [`Reviewer`] extractor runs before the
//! handler body, so a denied request never reaches the store or the query
//! engine.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use triage_core::auth::{authorize, AuthError, Credential, ReviewerGate};

use crate::error::ApiError;
use crate::AppState;

/// Gate comparing the Basic Auth password against a shared secret.
pub struct PasswordGate {
    admin_password: Option<String>,
}

impl PasswordGate {
    pub fn new(admin_password: Option<String>) -> Self {
        Self { admin_password }
    }

    /// False when no admin password was supplied at startup. That is a
    /// server misconfiguration, not a caller error.
    pub fn is_configured(&self) -> bool {
        self.admin_password.is_some()
    }
}

impl ReviewerGate for PasswordGate {
    fn is_authorized(&self, credential: &Credential) -> bool {
        self.admin_password.as_deref() == Some(credential.secret())
    }
}

/// Proof of a passed reviewer check.
pub struct Reviewer;

#[async_trait]
impl FromRequestParts<AppState> for Reviewer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Header first: a caller who sent no credential gets a 401, even
        // when the server-side password is missing. Only a caller who did
        // present credentials sees the misconfiguration as a 500.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let Some(credential) = header.and_then(parse_basic_credential) else {
            return Err(ApiError::Auth(AuthError::MissingCredential));
        };

        if !state.gate.is_configured() {
            return Err(ApiError::ServerMisconfigured);
        }

        authorize(state.gate.as_ref(), Some(&credential))?;
        Ok(Reviewer)
    }
}

/// Extract the password from a `Basic` authorization header value.
/// Returns `None` for anything malformed; the caller treats that the same
/// as a missing header.
fn parse_basic_credential(header: &str) -> Option<Credential> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (_username, password) = text.split_once(':')?;
    Some(Credential::new(password))
}
