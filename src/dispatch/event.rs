//! Interaction event value type
//!
//! One `InteractionEvent` is created per user action delivered by the
//! gateway, consumed exactly once by the dispatcher, and discarded after the
//! terminal response.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

/// The five interaction kinds the dispatcher routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Command,
    ContextMenuCommand,
    Button,
    SelectMenu,
    ModalSubmit,
}

impl InteractionKind {
    /// Component-style kinds carry a custom-id instead of a command name.
    pub fn is_component(self) -> bool {
        matches!(
            self,
            InteractionKind::Button | InteractionKind::SelectMenu | InteractionKind::ModalSubmit
        )
    }
}

/// A single inbound interaction.
///
/// The payload fields are immutable; only the response-state flags mutate,
/// and they move monotonically: unanswered, then deferred or replied, then
/// any number of follow-ups. Nothing ever clears a flag, which is what lets
/// the dispatcher decide between `reply` and `follow_up` without racing the
/// handler.
#[derive(Debug)]
pub struct InteractionEvent {
    pub id: u64,
    pub kind: InteractionKind,
    /// Command name for (context-menu) commands, raw custom-id for components.
    pub identifier: String,
    pub user_id: u64,
    pub guild_id: Option<u64>,
    /// Opaque option payload (command options, resolved targets).
    pub options: Value,
    /// Select-menu values or modal text inputs, in row order.
    pub values: Vec<String>,
    replied: AtomicBool,
    deferred: AtomicBool,
}

impl InteractionEvent {
    pub fn new(id: u64, kind: InteractionKind, identifier: impl Into<String>, user_id: u64) -> Self {
        Self {
            id,
            kind,
            identifier: identifier.into(),
            user_id,
            guild_id: None,
            options: Value::Null,
            values: Vec::new(),
            replied: AtomicBool::new(false),
            deferred: AtomicBool::new(false),
        }
    }

    pub fn with_guild(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    pub fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    /// True once any initial response (reply or defer) has been sent.
    /// Subsequent output must go through `follow_up`/`edit_reply`.
    pub fn has_responded(&self) -> bool {
        self.replied() || self.deferred()
    }

    pub fn mark_replied(&self) {
        self.replied.store(true, Ordering::SeqCst);
    }

    pub fn mark_deferred(&self) {
        self.deferred.store(true, Ordering::SeqCst);
    }
}
