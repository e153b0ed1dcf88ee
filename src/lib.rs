//! # Switchboard
//!
//! An interaction dispatch engine for Discord application commands. Inbound
//! commands, context menus, components, and modals are routed to registered
//! handlers with per-user cooldowns, loading indicators for slow work, and a
//! guaranteed terminal response per interaction. A registration manager
//! synchronizes the command set with the platform at startup.

// Shared config, response payloads, and standard embeds
pub mod core;

// Interaction routing and lifecycle
pub mod dispatch;

// Cooldowns, loading indicators, command registration
pub mod features;

// Handler trait, registry, and built-in handlers
pub mod commands;

// Guild settings persistence
pub mod store;

// Serenity adapters (events in, responses and REST out)
pub mod gateway;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use crate::commands::{HandlerRegistry, InteractionHandler, SharedContext};
pub use crate::core::Config;
pub use crate::dispatch::{Dispatcher, InteractionEvent, InteractionKind, NotificationChannel};
pub use crate::features::cooldown::CooldownTracker;
pub use crate::features::loading::{ActiveIndicators, LoadingIndicator};
pub use crate::features::registration::{RegistrationManager, RegistrationResult};
