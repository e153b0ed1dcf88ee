//! Setup wizard and reset flow
//!
//! Two multi-step flows driven by fixed-prefix custom-ids. Their owner
//! tokens are routed ahead of the generic registry so the wizard's buttons
//! keep working even if another handler claims a similar token later.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Guided setup with style/channel steps, confirm-guarded reset

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use crate::commands::context::SharedContext;
use crate::commands::handler::{InteractionHandler, Outcome};
use crate::core::response::{MessageButton, ResponseMessage};
use crate::dispatch::channel::NotificationChannel;
use crate::dispatch::custom_id::CustomId;
use crate::dispatch::event::InteractionEvent;

/// Owner token for every setup wizard component.
pub const SETUP_OWNER: &str = "setup";
/// Owner token for every reset flow component.
pub const RESET_OWNER: &str = "reset";

const WIZARD_COLOR: u32 = 0x5865F2;

/// First option name of a slash command, when it is a subcommand.
fn subcommand(event: &InteractionEvent) -> Option<&str> {
    event
        .options
        .get("options")?
        .as_array()?
        .first()?
        .get("name")?
        .as_str()
}

/// Ephemeral nudge for flows that only make sense inside a guild.
async fn require_guild(
    event: &InteractionEvent,
    channel: &dyn NotificationChannel,
) -> Result<Option<u64>> {
    match event.guild_id {
        Some(guild_id) => Ok(Some(guild_id)),
        None => {
            channel
                .reply(&ResponseMessage::text("This only works inside a server.").ephemeral())
                .await?;
            event.mark_replied();
            Ok(None)
        }
    }
}

/// Guided configuration wizard behind `/setup`.
pub struct SetupWizard;

impl SetupWizard {
    async fn start(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
    ) -> Result<()> {
        let message = ResponseMessage::embed(
            "Server Setup",
            "Walk through the configuration step by step. Ready?",
            WIZARD_COLOR,
        )
        .with_buttons(vec![
            MessageButton::new(
                CustomId::new(SETUP_OWNER, "begin").to_string(),
                "Begin",
            ),
            MessageButton::new(
                CustomId::new(SETUP_OWNER, "cancel").to_string(),
                "Cancel",
            ),
        ]);
        channel.reply(&message).await?;
        event.mark_replied();
        Ok(())
    }

    async fn show(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
        guild_id: u64,
    ) -> Result<()> {
        let settings = ctx.store.get(guild_id, "setup").await?;
        let text = match settings {
            Some(value) if value != json!({}) => {
                format!("```json\n{}\n```", serde_json::to_string_pretty(&value)?)
            }
            _ => "Not configured yet. Run `/setup start` to begin.".to_string(),
        };
        channel
            .reply(&ResponseMessage::embed("Current Setup", text, WIZARD_COLOR).ephemeral())
            .await?;
        event.mark_replied();
        Ok(())
    }

    fn style_step() -> ResponseMessage {
        ResponseMessage::embed(
            "Step 1 of 2",
            "Pick a display style for bot messages.",
            WIZARD_COLOR,
        )
        .with_buttons(vec![
            MessageButton::new(
                CustomId::new(SETUP_OWNER, "style").with_payload("compact").to_string(),
                "Compact",
            ),
            MessageButton::new(
                CustomId::new(SETUP_OWNER, "style").with_payload("detailed").to_string(),
                "Detailed",
            ),
        ])
    }

    fn finish_step(style: &str) -> ResponseMessage {
        ResponseMessage::embed(
            "Step 2 of 2",
            format!("Style set to `{style}`. Finish to save, or run `/setup start` again to change it."),
            WIZARD_COLOR,
        )
        .with_buttons(vec![MessageButton::new(
            CustomId::new(SETUP_OWNER, "finish").to_string(),
            "Finish",
        )])
    }
}

#[async_trait]
impl InteractionHandler for SetupWizard {
    fn command_names(&self) -> &'static [&'static str] {
        &["setup"]
    }

    fn owner_tokens(&self) -> &'static [&'static str] {
        &[SETUP_OWNER]
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
        let Some(guild_id) = require_guild(event, channel).await? else {
            return Ok(Outcome::Handled);
        };
        match subcommand(event) {
            Some("show") => self.show(event, channel, ctx, guild_id).await?,
            // "start" and bare /setup both open the wizard.
            _ => self.start(event, channel).await?,
        }
        Ok(Outcome::Handled)
    }

    async fn handle_button(
        &self,
        event: &InteractionEvent,
        custom_id: &CustomId,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        let Some(guild_id) = require_guild(event, channel).await? else {
            return Ok(Outcome::Handled);
        };
        match custom_id.action.as_str() {
            "begin" => {
                channel.edit_reply(&Self::style_step()).await?;
            }
            "style" => {
                let style = custom_id.payload.as_deref().unwrap_or("compact");
                ctx.store.update(guild_id, "setup.style", json!(style)).await?;
                channel.edit_reply(&Self::finish_step(style)).await?;
            }
            "finish" => {
                ctx.store.update(guild_id, "setup.completed", json!(true)).await?;
                channel
                    .edit_reply(&ResponseMessage::embed(
                        "Setup Complete",
                        "✅ Configuration saved. Run `/setup show` any time to review it.",
                        WIZARD_COLOR,
                    ))
                    .await?;
            }
            "cancel" => {
                channel
                    .edit_reply(&ResponseMessage::embed(
                        "Setup Cancelled",
                        "Nothing was changed.",
                        WIZARD_COLOR,
                    ))
                    .await?;
            }
            _ => return Ok(Outcome::Unsupported),
        }
        event.mark_replied();
        Ok(Outcome::Handled)
    }

    async fn handle_select_menu(
        &self,
        event: &InteractionEvent,
        custom_id: &CustomId,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        let Some(guild_id) = require_guild(event, channel).await? else {
            return Ok(Outcome::Handled);
        };
        if custom_id.action != "channel" {
            return Ok(Outcome::Unsupported);
        }
        let Some(channel_id) = event.values.first() else {
            return Ok(Outcome::Unsupported);
        };
        ctx.store
            .update(guild_id, "setup.channel", json!(channel_id))
            .await?;
        channel
            .edit_reply(&ResponseMessage::embed(
                "Channel Saved",
                format!("Announcements will go to <#{channel_id}>."),
                WIZARD_COLOR,
            ))
            .await?;
        event.mark_replied();
        Ok(Outcome::Handled)
    }

    async fn handle_modal(
        &self,
        event: &InteractionEvent,
        custom_id: &CustomId,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        let Some(guild_id) = require_guild(event, channel).await? else {
            return Ok(Outcome::Handled);
        };
        if custom_id.action != "note" {
            return Ok(Outcome::Unsupported);
        }
        let note = event.values.join("\n");
        ctx.store.update(guild_id, "setup.note", json!(note)).await?;
        channel
            .reply(&ResponseMessage::text("📝 Note saved.").ephemeral())
            .await?;
        event.mark_replied();
        Ok(Outcome::Handled)
    }
}

/// Confirm-guarded `/reset` that wipes the guild's settings.
pub struct ResetFlow;

#[async_trait]
impl InteractionHandler for ResetFlow {
    fn command_names(&self) -> &'static [&'static str] {
        &["reset"]
    }

    fn owner_tokens(&self) -> &'static [&'static str] {
        &[RESET_OWNER]
    }

    fn skip_loading(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
        _ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        if require_guild(event, channel).await?.is_none() {
            return Ok(Outcome::Handled);
        }
        let message = ResponseMessage::embed(
            "Reset Configuration",
            "⚠️ This wipes every setting for this server. There is no undo.",
            0xED4245,
        )
        .ephemeral()
        .with_buttons(vec![
            MessageButton::new(CustomId::new(RESET_OWNER, "confirm").to_string(), "Wipe it"),
            MessageButton::new(CustomId::new(RESET_OWNER, "cancel").to_string(), "Keep it"),
        ]);
        channel.reply(&message).await?;
        event.mark_replied();
        Ok(Outcome::Handled)
    }

    async fn handle_button(
        &self,
        event: &InteractionEvent,
        custom_id: &CustomId,
        channel: &dyn NotificationChannel,
        ctx: Arc<SharedContext>,
    ) -> Result<Outcome> {
        let Some(guild_id) = require_guild(event, channel).await? else {
            return Ok(Outcome::Handled);
        };
        match custom_id.action.as_str() {
            "confirm" => {
                ctx.store.update(guild_id, "", json!({})).await?;
                channel
                    .edit_reply(&ResponseMessage::embed(
                        "Configuration Wiped",
                        "✅ All settings for this server were removed.",
                        0xED4245,
                    ))
                    .await?;
            }
            "cancel" => {
                channel
                    .edit_reply(&ResponseMessage::embed(
                        "Reset Cancelled",
                        "Your settings are untouched.",
                        0x5865F2,
                    ))
                    .await?;
            }
            _ => return Ok(Outcome::Unsupported),
        }
        event.mark_replied();
        Ok(Outcome::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::event::InteractionKind;
    use crate::features::loading::ActiveIndicators;
    use crate::store::{MemoryStore, SettingsStore};
    use crate::test_support::RecordingChannel;

    const GUILD: u64 = 100;

    fn ctx() -> Arc<SharedContext> {
        Arc::new(SharedContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ActiveIndicators::new()),
        ))
    }

    fn button(id: u64, raw: &str) -> (InteractionEvent, CustomId) {
        let event =
            InteractionEvent::new(id, InteractionKind::Button, raw, 42).with_guild(GUILD);
        let custom_id = CustomId::parse(raw).unwrap();
        (event, custom_id)
    }

    #[tokio::test]
    async fn test_setup_start_offers_begin_button() {
        let event = InteractionEvent::new(1, InteractionKind::Command, "setup", 42)
            .with_guild(GUILD)
            .with_options(json!({"options": [{"name": "start"}]}));
        let channel = RecordingChannel::new();

        let outcome = SetupWizard.execute(&event, &channel, ctx()).await.unwrap();

        assert_eq!(outcome, Outcome::Handled);
        let reply = &channel.replies()[0];
        assert!(reply
            .buttons
            .iter()
            .any(|b| b.custom_id == "setup-begin"));
    }

    #[tokio::test]
    async fn test_setup_outside_guild_is_rejected() {
        let event = InteractionEvent::new(2, InteractionKind::Command, "setup", 42);
        let channel = RecordingChannel::new();

        SetupWizard.execute(&event, &channel, ctx()).await.unwrap();

        let reply = &channel.replies()[0];
        assert!(reply.ephemeral);
        assert!(reply.text.contains("inside a server"));
    }

    #[tokio::test]
    async fn test_style_button_persists_choice() {
        let shared = ctx();
        let (event, custom_id) = button(3, "setup-style-detailed");
        let channel = RecordingChannel::new();

        SetupWizard
            .handle_button(&event, &custom_id, &channel, shared.clone())
            .await
            .unwrap();

        assert_eq!(
            shared.store.get(GUILD, "setup.style").await.unwrap(),
            Some(json!("detailed"))
        );
        assert!(channel.edits()[0]
            .buttons
            .iter()
            .any(|b| b.custom_id == "setup-finish"));
    }

    #[tokio::test]
    async fn test_finish_marks_setup_complete() {
        let shared = ctx();
        let (event, custom_id) = button(4, "setup-finish");
        let channel = RecordingChannel::new();

        SetupWizard
            .handle_button(&event, &custom_id, &channel, shared.clone())
            .await
            .unwrap();

        assert_eq!(
            shared.store.get(GUILD, "setup.completed").await.unwrap(),
            Some(json!(true))
        );
    }

    #[tokio::test]
    async fn test_select_menu_saves_channel() {
        let shared = ctx();
        let event = InteractionEvent::new(5, InteractionKind::SelectMenu, "setup-channel", 42)
            .with_guild(GUILD)
            .with_values(vec!["555".to_string()]);
        let custom_id = CustomId::parse("setup-channel").unwrap();
        let channel = RecordingChannel::new();

        SetupWizard
            .handle_select_menu(&event, &custom_id, &channel, shared.clone())
            .await
            .unwrap();

        assert_eq!(
            shared.store.get(GUILD, "setup.channel").await.unwrap(),
            Some(json!("555"))
        );
    }

    #[tokio::test]
    async fn test_unknown_action_is_unsupported() {
        let (event, custom_id) = button(6, "setup-mystery");
        let channel = RecordingChannel::new();

        let outcome = SetupWizard
            .handle_button(&event, &custom_id, &channel, ctx())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unsupported);
        assert!(channel.edits().is_empty());
    }

    #[tokio::test]
    async fn test_reset_confirm_wipes_settings() {
        let shared = ctx();
        shared
            .store
            .update(GUILD, "setup.style", json!("compact"))
            .await
            .unwrap();
        let (event, custom_id) = button(7, "reset-confirm");
        let channel = RecordingChannel::new();

        ResetFlow
            .handle_button(&event, &custom_id, &channel, shared.clone())
            .await
            .unwrap();

        assert_eq!(shared.store.get(GUILD, "").await.unwrap(), Some(json!({})));
        assert!(channel.edits()[0].text.contains("removed"));
    }

    #[tokio::test]
    async fn test_reset_cancel_keeps_settings() {
        let shared = ctx();
        shared
            .store
            .update(GUILD, "setup.style", json!("compact"))
            .await
            .unwrap();
        let (event, custom_id) = button(8, "reset-cancel");
        let channel = RecordingChannel::new();

        ResetFlow
            .handle_button(&event, &custom_id, &channel, shared.clone())
            .await
            .unwrap();

        assert_eq!(
            shared.store.get(GUILD, "setup.style").await.unwrap(),
            Some(json!("compact"))
        );
    }
}
