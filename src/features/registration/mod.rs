//! # Feature: Command Registration
//!
//! Synchronizes the crate's command definitions with the platform at startup.
//! Prefers a single bulk overwrite; falls back to paced per-item calls when
//! the bulk request is rejected, so one malformed definition cannot sink the
//! whole set. Guild registration retries transient failures with a doubling
//! delay and isolates failures per guild.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with bulk-first registration and guild retry loop

mod api;
mod definition;
mod manager;

pub use api::{CommandApi, RegistrationError, RegistrationTarget};
pub use definition::{CommandDefinition, CommandKind};
pub use manager::{RegistrationConfig, RegistrationManager, RegistrationResult};
