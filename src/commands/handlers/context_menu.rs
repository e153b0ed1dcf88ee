//! User and message context menu entries
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::commands::context::SharedContext;
use crate::commands::handler::{InteractionHandler, Outcome};
use crate::core::response::ResponseMessage;
use crate::dispatch::channel::NotificationChannel;
use crate::dispatch::event::InteractionEvent;
use crate::features::loading::{LoadingStyle, StopOutcome};

/// Right-click entries on users and messages.
pub struct ContextMenuHandler;

/// Snowflakes arrive as strings on the wire but tests build them as numbers.
fn snowflake(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::to_string)
        .or_else(|| value.as_u64().map(|n| n.to_string()))
}

impl ContextMenuHandler {
    fn user_info(options: &Value) -> Option<String> {
        let target_id = snowflake(options.get("target_id")?)?;
        let user = options.get("resolved")?.get("users")?.get(&target_id)?;
        let name = user.get("username")?.as_str()?;
        Some(format!("**{name}** (<@{target_id}>)\nID: `{target_id}`"))
    }

    fn quote(options: &Value) -> Option<String> {
        let target_id = snowflake(options.get("target_id")?)?;
        let message = options.get("resolved")?.get("messages")?.get(&target_id)?;
        let content = message.get("content")?.as_str()?;
        let author = message
            .get("author")
            .and_then(|a| a.get("id"))
            .and_then(snowflake);
        Some(match author {
            Some(author_id) => format!("💬 {content}\n— <@{author_id}>"),
            None => format!("💬 {content}"),
        })
    }
}

#[async_trait]
impl InteractionHandler for ContextMenuHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["User Info", "Quote Message"]
    }

    fn loading_style(&self) -> LoadingStyle {
        LoadingStyle::Pulse
    }

    async fn execute(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        let text = match event.identifier.as_str() {
            "User Info" => Self::user_info(&event.options),
            "Quote Message" => Self::quote(&event.options),
            _ => return Ok(Outcome::Unsupported),
        };
        let text = text.unwrap_or_else(|| "Could not resolve the target.".to_string());

        // Prefer finishing through the loading indicator so the processing
        // message becomes the result. Without one, answer directly.
        let stopped = ctx
            .indicators
            .stop(event.id, channel, StopOutcome::Success, &text)
            .await?;
        if !stopped {
            channel.reply(&ResponseMessage::text(text)).await?;
            event.mark_replied();
        }
        Ok(Outcome::Handled)
    }
}
