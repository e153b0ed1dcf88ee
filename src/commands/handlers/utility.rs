//! Ping and help commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::SharedContext;
use crate::commands::definitions::create_command_definitions;
use crate::commands::handler::{InteractionHandler, Outcome};
use crate::core::response::ResponseMessage;
use crate::dispatch::channel::NotificationChannel;
use crate::dispatch::event::InteractionEvent;

/// Fast informational commands that answer inline.
pub struct UtilityHandler;

#[async_trait]
impl InteractionHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ping", "help"]
    }

    fn skip_loading(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        let message = match event.identifier.as_str() {
            "ping" => {
                let uptime = ctx.uptime().as_secs();
                ResponseMessage::text(format!("🏓 Pong! Up for {uptime}s."))
            }
            "help" => help_message(),
            _ => return Ok(Outcome::Unsupported),
        };
        channel.reply(&message).await?;
        event.mark_replied();
        Ok(Outcome::Handled)
    }
}

fn help_message() -> ResponseMessage {
    let mut lines = Vec::new();
    for definition in create_command_definitions() {
        if definition.kind.is_context_menu() {
            continue;
        }
        let description = definition.description.as_deref().unwrap_or("");
        lines.push(format!("`/{}` — {}", definition.name, description));
    }
    ResponseMessage::embed("Commands", lines.join("\n"), 0x5865F2).ephemeral()
}
