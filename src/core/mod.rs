//! # Core Module
//!
//! Shared configuration, response payload types, and the standard embeds the
//! dispatch engine sends on its own behalf.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod embeds;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{truncate_for_embed, MessageButton, ResponseMessage, EMBED_LIMIT};
