//! Registration API surface
//!
//! The narrow slice of the application-command REST API the manager needs.
//! The serenity-backed implementation lives in `crate::gateway`; tests use a
//! scripted double.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Where a set of commands is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationTarget {
    Global,
    Guild(u64),
}

impl fmt::Display for RegistrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationTarget::Global => write!(f, "global application"),
            RegistrationTarget::Guild(id) => write!(f, "guild {id}"),
        }
    }
}

/// Failures the retry loop distinguishes.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// Rate limits and server-side errors. Worth retrying.
    #[error("transient registration failure: {0}")]
    Transient(String),
    /// The API rejected the payload. Retrying the same payload cannot help.
    #[error("registration rejected: {0}")]
    Rejected(String),
}

impl RegistrationError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistrationError::Transient(_))
    }
}

/// REST operations the registration manager drives.
#[async_trait]
pub trait CommandApi: Send + Sync {
    /// Bulk overwrite the full command set. Returns the number registered.
    async fn bulk_set(
        &self,
        target: RegistrationTarget,
        payload: &Value,
    ) -> Result<usize, RegistrationError>;

    /// Register a single command.
    async fn create(
        &self,
        target: RegistrationTarget,
        payload: &Value,
    ) -> Result<(), RegistrationError>;

    /// List currently registered commands as (id, name) pairs.
    async fn fetch(
        &self,
        target: RegistrationTarget,
    ) -> Result<Vec<(u64, String)>, RegistrationError>;

    /// Delete one registered command by id.
    async fn delete(
        &self,
        target: RegistrationTarget,
        command_id: u64,
    ) -> Result<(), RegistrationError>;
}
