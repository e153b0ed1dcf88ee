//! # Commands Module
//!
//! The handler trait, the registry the dispatcher routes through, shared
//! handler context, and the built-in command set.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

pub mod context;
pub mod definitions;
pub mod handler;
pub mod handlers;
pub mod registry;

pub use context::SharedContext;
pub use definitions::{create_command_definitions, load_definitions};
pub use handler::{InteractionHandler, Outcome};
pub use registry::HandlerRegistry;
