//! Interaction handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for modular interaction handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::context::SharedContext;
use crate::core::embeds;
use crate::dispatch::channel::NotificationChannel;
use crate::dispatch::custom_id::CustomId;
use crate::dispatch::event::InteractionEvent;
use crate::features::loading::LoadingStyle;

/// Whether a handler actually processed the event it was routed.
///
/// `Unsupported` means the handler does not implement this interaction kind;
/// the dispatcher logs it and drops the event without surfacing an error to
/// the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Unsupported,
}

/// Trait for interaction handlers
///
/// A handler can serve slash commands, context menu entries, and components,
/// in any combination. Command and context menu names route through
/// `command_names`; components route through the owner token of their
/// custom-id via `owner_tokens`.
///
/// Handlers that send their own initial response must call
/// `event.mark_replied()` so the dispatcher knows to use follow-ups for any
/// later output on the same interaction.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl InteractionHandler for PingHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     fn skip_loading(&self) -> bool {
///         true
///     }
///
///     async fn execute(
///         &self,
///         event: &InteractionEvent,
///         channel: &dyn NotificationChannel,
///         _ctx: Arc<SharedContext>,
///     ) -> Result<Outcome> {
///         channel.reply(&ResponseMessage::text("Pong!")).await?;
///         event.mark_replied();
///         Ok(Outcome::Handled)
///     }
/// }
/// ```
#[async_trait]
pub trait InteractionHandler: Send + Sync {
    /// Slash command and context menu names this handler serves.
    fn command_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Custom-id owner tokens this handler serves components for.
    fn owner_tokens(&self) -> &'static [&'static str] {
        &[]
    }

    /// Per-user cooldown for this handler's commands. `None` uses the
    /// configured default; `Some(Duration::ZERO)` disables the cooldown.
    fn cooldown(&self) -> Option<Duration> {
        None
    }

    /// Skip the loading indicator for handlers that respond immediately.
    fn skip_loading(&self) -> bool {
        false
    }

    fn loading_style(&self) -> LoadingStyle {
        LoadingStyle::Dots
    }

    fn loading_color(&self) -> u32 {
        embeds::colors::PROCESSING
    }

    /// Handle a slash command or context menu command.
    async fn execute(
        &self,
        _event: &InteractionEvent,
        _channel: &dyn NotificationChannel,
        _ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        Ok(Outcome::Unsupported)
    }

    /// Handle a button press routed by owner token.
    async fn handle_button(
        &self,
        _event: &InteractionEvent,
        _custom_id: &CustomId,
        _channel: &dyn NotificationChannel,
        _ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        Ok(Outcome::Unsupported)
    }

    /// Handle a select menu submission routed by owner token.
    async fn handle_select_menu(
        &self,
        _event: &InteractionEvent,
        _custom_id: &CustomId,
        _channel: &dyn NotificationChannel,
        _ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        Ok(Outcome::Unsupported)
    }

    /// Handle a modal submission routed by owner token.
    async fn handle_modal(
        &self,
        _event: &InteractionEvent,
        _custom_id: &CustomId,
        _channel: &dyn NotificationChannel,
        _ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        Ok(Outcome::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe (can be used with dyn)
    fn _assert_object_safe(_: &dyn InteractionHandler) {}
}
