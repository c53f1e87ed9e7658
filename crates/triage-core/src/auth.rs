//! Reviewer gate consumed by the protected operations.
//!
//! The core sees a single allow/deny capability. Credential parsing,
//! comparison, and storage belong to the caller; a denial here must happen
//! before any query or lifecycle work executes.

use std::fmt;
use thiserror::Error;

/// Authentication failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingCredential,

    #[error("Invalid credentials")]
    Denied,
}

/// Opaque reviewer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for gate implementations only.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Never echo the secret in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Boolean authorization capability supplied by the host.
pub trait ReviewerGate {
    fn is_authorized(&self, credential: &Credential) -> bool;
}

/// Check a credential against the gate.
///
/// A missing credential is rejected without consulting the gate at all.
pub fn authorize(
    gate: &dyn ReviewerGate,
    credential: Option<&Credential>,
) -> Result<(), AuthError> {
    match credential {
        None => Err(AuthError::MissingCredential),
        Some(c) if gate.is_authorized(c) => Ok(()),
        Some(_) => Err(AuthError::Denied),
    }
}
