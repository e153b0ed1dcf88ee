//! Interaction handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::InteractionHandler;

/// Registry mapping command names and custom-id owner tokens to handlers
///
/// Command and context menu names share one namespace; component custom-id
/// owner tokens are a second, independent one. The same handler may appear
/// in both when it serves a command and its follow-up components.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    commands: HashMap<&'static str, Arc<dyn InteractionHandler>>,
    owners: HashMap<&'static str, Arc<dyn InteractionHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for all its declared names and owner tokens
    pub fn register(&mut self, handler: Arc<dyn InteractionHandler>) {
        for name in handler.command_names() {
            self.commands.insert(name, Arc::clone(&handler));
        }
        for token in handler.owner_tokens() {
            self.owners.insert(token, Arc::clone(&handler));
        }
    }

    /// Get the handler for a command or context menu name
    pub fn get_command(&self, name: &str) -> Option<Arc<dyn InteractionHandler>> {
        self.commands.get(name).cloned()
    }

    /// Get the handler for a component custom-id owner token
    pub fn get_owner(&self, token: &str) -> Option<Arc<dyn InteractionHandler>> {
        self.owners.get(token).cloned()
    }

    /// Check if a command name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Number of registered command names
    ///
    /// Note: this counts names, not unique handlers. A handler registered
    /// for multiple names is counted multiple times.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry holds no command names
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get all registered command names
    pub fn command_names(&self) -> impl Iterator<Item = &&'static str> {
        self.commands.keys()
    }
}
