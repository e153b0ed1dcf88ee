//! # Dispatch Module
//!
//! Routes every inbound interaction to exactly one handler and guarantees
//! the interaction reaches exactly one terminal response: the handler's own
//! reply, a stopped loading indicator, a cooldown notice, or the generic
//! error message. Unknown commands and stale components are dropped
//! silently.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial dispatch engine with cooldowns and loading indicators

pub mod channel;
pub mod custom_id;
pub mod error;
pub mod event;

use std::sync::Arc;

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::commands::context::SharedContext;
use crate::commands::handler::{InteractionHandler, Outcome};
use crate::commands::handlers::setup::{ResetFlow, SetupWizard, RESET_OWNER, SETUP_OWNER};
use crate::commands::registry::HandlerRegistry;
use crate::core::embeds;
use crate::features::cooldown::CooldownTracker;
use crate::features::loading::{ActiveIndicators, LoadingIndicator, StopOutcome};

pub use channel::NotificationChannel;
pub use custom_id::CustomId;
pub use error::DispatchError;
pub use event::{InteractionEvent, InteractionKind};

/// Commands that answer fast enough that a loading indicator is noise,
/// regardless of what their handler declares.
const SKIP_LOADING_COMMANDS: &[&str] = &["ping", "help"];

/// The interaction dispatch engine.
///
/// One instance serves the whole process. Owner tokens of the setup wizard
/// and reset flow are routed ahead of the generic registry so those flows
/// cannot be shadowed by a later registration.
pub struct Dispatcher {
    registry: HandlerRegistry,
    cooldowns: CooldownTracker,
    indicators: Arc<ActiveIndicators>,
    ctx: Arc<SharedContext>,
    setup: Arc<SetupWizard>,
    reset: Arc<ResetFlow>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry, cooldowns: CooldownTracker, ctx: Arc<SharedContext>) -> Self {
        Self {
            registry,
            cooldowns,
            indicators: Arc::clone(&ctx.indicators),
            ctx,
            setup: Arc::new(SetupWizard),
            reset: Arc::new(ResetFlow),
        }
    }

    /// Dispatch one interaction. Returns `Err` only for transport failures;
    /// routing misses and handler faults are absorbed here.
    pub async fn dispatch(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
    ) -> anyhow::Result<()> {
        let request_id = Uuid::new_v4();
        info!(
            "[{request_id}] 📥 {:?} '{}' from user {}",
            event.kind, event.identifier, event.user_id
        );

        let result = if event.kind.is_component() {
            self.run_component(event, channel).await
        } else {
            self.run_command(event, channel).await
        };

        match result {
            Ok(()) => {
                info!("[{request_id}] ✅ '{}' dispatched", event.identifier);
                Ok(())
            }
            Err(DispatchError::HandlerNotFound(name)) => {
                warn!("[{request_id}] no handler for '{name}', dropping");
                Ok(())
            }
            Err(DispatchError::StaleComponent(raw)) => {
                debug!("[{request_id}] stale component '{raw}', dropping");
                Ok(())
            }
            Err(DispatchError::CooldownActive { command, remaining }) => {
                let secs = remaining.as_secs_f64().ceil() as u64;
                info!("[{request_id}] ⏳ '{command}' on cooldown for user {} ({secs}s)", event.user_id);
                channel
                    .reply(&embeds::cooldown_notice(&command, secs))
                    .await?;
                event.mark_replied();
                Ok(())
            }
            Err(DispatchError::HandlerFault { identifier, source }) => {
                error!("[{request_id}] ❌ handler '{identifier}' failed: {source:#}");
                self.fail_interaction(event, channel).await
            }
        }
    }

    /// Route a slash command or context menu command by name.
    async fn run_command(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
    ) -> Result<(), DispatchError> {
        let handler = self
            .registry
            .get_command(&event.identifier)
            .ok_or_else(|| DispatchError::HandlerNotFound(event.identifier.clone()))?;

        // Cooldowns apply to slash commands only; context menus and
        // components run unthrottled.
        if event.kind == InteractionKind::Command {
            if let Some(remaining) = self.cooldowns.check(&event.identifier, event.user_id) {
                return Err(DispatchError::CooldownActive {
                    command: event.identifier.clone(),
                    remaining,
                });
            }
            let duration = handler
                .cooldown()
                .unwrap_or_else(|| self.cooldowns.default_cooldown());
            self.cooldowns.arm(&event.identifier, event.user_id, duration);
        }

        self.invoke(event, channel, handler, None).await
    }

    /// Route a component or modal by the owner token of its custom-id.
    async fn run_component(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
    ) -> Result<(), DispatchError> {
        let custom_id = CustomId::parse(&event.identifier)
            .ok_or_else(|| DispatchError::StaleComponent(event.identifier.clone()))?;

        let handler: Arc<dyn InteractionHandler> = match custom_id.owner.as_str() {
            SETUP_OWNER => self.setup.clone(),
            RESET_OWNER => self.reset.clone(),
            owner => self
                .registry
                .get_owner(owner)
                .ok_or_else(|| DispatchError::StaleComponent(event.identifier.clone()))?,
        };

        self.invoke(event, channel, handler, Some(custom_id)).await
    }

    async fn invoke(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
        handler: Arc<dyn InteractionHandler>,
        custom_id: Option<CustomId>,
    ) -> Result<(), DispatchError> {
        let wants_loading = !handler.skip_loading()
            && !SKIP_LOADING_COMMANDS.contains(&event.identifier.as_str());

        if wants_loading {
            let indicator = Arc::new(LoadingIndicator::new(
                event.id,
                "Working on it...",
                handler.loading_style(),
                handler.loading_color(),
            ));
            self.indicators.register(Arc::clone(&indicator));
            if let Err(err) = indicator.begin(event, channel).await {
                warn!("could not start loading indicator for '{}': {err:#}", event.identifier);
                self.indicators.remove(event.id);
            }
        }

        let ctx = Arc::clone(&self.ctx);
        let result = match (&custom_id, event.kind) {
            (Some(id), InteractionKind::Button) => {
                handler.handle_button(event, id, channel, ctx).await
            }
            (Some(id), InteractionKind::SelectMenu) => {
                handler.handle_select_menu(event, id, channel, ctx).await
            }
            (Some(id), InteractionKind::ModalSubmit) => {
                handler.handle_modal(event, id, channel, ctx).await
            }
            _ => handler.execute(event, channel, ctx).await,
        };

        match result {
            Ok(Outcome::Handled) => {
                // No-op when the handler stopped its own indicator or none
                // was started.
                if let Err(err) = self
                    .indicators
                    .stop(event.id, channel, StopOutcome::Success, "Completed successfully.")
                    .await
                {
                    warn!("could not finish loading indicator for '{}': {err:#}", event.identifier);
                }
                Ok(())
            }
            Ok(Outcome::Unsupported) => {
                warn!(
                    "handler for '{}' does not support {:?}, dropping",
                    event.identifier, event.kind
                );
                if let Err(err) = self
                    .indicators
                    .stop(event.id, channel, StopOutcome::Failure, "This action is not available.")
                    .await
                {
                    warn!("could not finish loading indicator for '{}': {err:#}", event.identifier);
                }
                Ok(())
            }
            Err(source) => Err(DispatchError::HandlerFault {
                identifier: event.identifier.clone(),
                source,
            }),
        }
    }

    /// Terminal response for a failed interaction. Prefers finishing through
    /// the loading indicator; falls back to a fresh reply or follow-up based
    /// on whether the interaction already has a response.
    async fn fail_interaction(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
    ) -> anyhow::Result<()> {
        match self
            .indicators
            .stop(
                event.id,
                channel,
                StopOutcome::Failure,
                "Sorry, something went wrong processing this.",
            )
            .await
        {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) => warn!("could not fail loading indicator: {err:#}"),
        }

        if event.has_responded() {
            channel.follow_up(&embeds::generic_error()).await
        } else {
            channel.reply(&embeds::generic_error()).await?;
            event.mark_replied();
            Ok(())
        }
    }
}
