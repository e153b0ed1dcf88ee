//! # Gateway Module
//!
//! Serenity-facing adapters: inbound interaction conversion into
//! [`InteractionEvent`], the [`NotificationChannel`] implementation over the
//! interaction response endpoints, the [`CommandApi`] implementation over
//! the application-command REST endpoints, and the gateway event handler
//! that ties everything to a running client.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial gateway wiring over serenity 0.11

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serde_json::Value;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::http::{Http, HttpError};
use serenity::model::application::command::CommandType;
use serenity::model::application::component::{ActionRowComponent, ButtonStyle, ComponentType};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::{Context, EventHandler};

use crate::core::response::{MessageButton, ResponseMessage};
use crate::dispatch::channel::NotificationChannel;
use crate::dispatch::event::{InteractionEvent, InteractionKind};
use crate::dispatch::Dispatcher;
use crate::features::registration::{
    CommandApi, CommandDefinition, RegistrationConfig, RegistrationError, RegistrationManager,
    RegistrationTarget,
};

/// Convert a command or context menu interaction.
pub fn command_event(interaction: &ApplicationCommandInteraction) -> InteractionEvent {
    let kind = match interaction.data.kind {
        CommandType::User | CommandType::Message => InteractionKind::ContextMenuCommand,
        _ => InteractionKind::Command,
    };
    let mut event = InteractionEvent::new(
        interaction.id.0,
        kind,
        interaction.data.name.clone(),
        interaction.user.id.0,
    );
    if let Some(guild_id) = interaction.guild_id {
        event = event.with_guild(guild_id.0);
    }
    // Handlers navigate the raw data shape (options, target_id, resolved).
    event.with_options(serde_json::to_value(&interaction.data).unwrap_or(Value::Null))
}

/// Convert a button or select menu interaction.
pub fn component_event(interaction: &MessageComponentInteraction) -> InteractionEvent {
    let kind = match interaction.data.component_type {
        ComponentType::SelectMenu => InteractionKind::SelectMenu,
        _ => InteractionKind::Button,
    };
    let mut event = InteractionEvent::new(
        interaction.id.0,
        kind,
        interaction.data.custom_id.clone(),
        interaction.user.id.0,
    );
    if let Some(guild_id) = interaction.guild_id {
        event = event.with_guild(guild_id.0);
    }
    event.with_values(interaction.data.values.clone())
}

/// Convert a modal submission, flattening its text inputs in row order.
pub fn modal_event(interaction: &ModalSubmitInteraction) -> InteractionEvent {
    let mut values = Vec::new();
    for row in &interaction.data.components {
        for component in &row.components {
            if let ActionRowComponent::InputText(input) = component {
                values.push(input.value.clone());
            }
        }
    }
    let mut event = InteractionEvent::new(
        interaction.id.0,
        InteractionKind::ModalSubmit,
        interaction.data.custom_id.clone(),
        interaction.user.id.0,
    );
    if let Some(guild_id) = interaction.guild_id {
        event = event.with_guild(guild_id.0);
    }
    event.with_values(values)
}

fn build_embed(message: &ResponseMessage) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    if let Some(title) = &message.title {
        embed.title(title);
    }
    embed.description(&message.text);
    if let Some(color) = message.color {
        embed.colour(color);
    }
    embed
}

fn build_buttons<'a>(
    components: &'a mut CreateComponents,
    buttons: &[MessageButton],
) -> &'a mut CreateComponents {
    components.create_action_row(|row| {
        for button in buttons {
            row.create_button(|b| {
                b.custom_id(&button.custom_id)
                    .label(&button.label)
                    .style(ButtonStyle::Primary)
            });
        }
        row
    })
}

fn wants_embed(message: &ResponseMessage) -> bool {
    message.title.is_some() || message.color.is_some()
}

enum InteractionTarget {
    Command(ApplicationCommandInteraction),
    Component(MessageComponentInteraction),
    Modal(ModalSubmitInteraction),
}

/// [`NotificationChannel`] over one interaction's response endpoints.
///
/// For components and modals, an `edit_reply` before any initial response is
/// sent as an `UpdateMessage` response, which edits the message the
/// component lives on. That is what lets the setup wizard advance its steps
/// in place.
pub struct GatewayChannel {
    http: Arc<Http>,
    target: InteractionTarget,
    responded: AtomicBool,
}

impl GatewayChannel {
    pub fn command(http: Arc<Http>, interaction: ApplicationCommandInteraction) -> Self {
        Self {
            http,
            target: InteractionTarget::Command(interaction),
            responded: AtomicBool::new(false),
        }
    }

    pub fn component(http: Arc<Http>, interaction: MessageComponentInteraction) -> Self {
        Self {
            http,
            target: InteractionTarget::Component(interaction),
            responded: AtomicBool::new(false),
        }
    }

    pub fn modal(http: Arc<Http>, interaction: ModalSubmitInteraction) -> Self {
        Self {
            http,
            target: InteractionTarget::Modal(interaction),
            responded: AtomicBool::new(false),
        }
    }

    async fn create_response(
        &self,
        kind: InteractionResponseType,
        message: &ResponseMessage,
    ) -> Result<()> {
        match &self.target {
            InteractionTarget::Command(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response.kind(kind).interaction_response_data(|data| {
                            if wants_embed(message) {
                                data.set_embed(build_embed(message));
                            } else {
                                data.content(&message.text);
                            }
                            if message.ephemeral {
                                data.ephemeral(true);
                            }
                            if !message.buttons.is_empty() {
                                data.components(|c| build_buttons(c, &message.buttons));
                            }
                            data
                        })
                    })
                    .await?;
            }
            InteractionTarget::Component(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response.kind(kind).interaction_response_data(|data| {
                            if wants_embed(message) {
                                data.set_embed(build_embed(message));
                            } else {
                                data.content(&message.text);
                            }
                            if message.ephemeral {
                                data.ephemeral(true);
                            }
                            if !message.buttons.is_empty() {
                                data.components(|c| build_buttons(c, &message.buttons));
                            }
                            data
                        })
                    })
                    .await?;
            }
            InteractionTarget::Modal(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response.kind(kind).interaction_response_data(|data| {
                            if wants_embed(message) {
                                data.set_embed(build_embed(message));
                            } else {
                                data.content(&message.text);
                            }
                            if message.ephemeral {
                                data.ephemeral(true);
                            }
                            data
                        })
                    })
                    .await?;
            }
        }
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit_original(&self, message: &ResponseMessage) -> Result<()> {
        match &self.target {
            InteractionTarget::Command(interaction) => {
                interaction
                    .edit_original_interaction_response(&self.http, |response| {
                        if wants_embed(message) {
                            response.set_embed(build_embed(message));
                        } else {
                            response.content(&message.text);
                        }
                        if !message.buttons.is_empty() {
                            response.components(|c| build_buttons(c, &message.buttons));
                        }
                        response
                    })
                    .await?;
            }
            InteractionTarget::Component(interaction) => {
                interaction
                    .edit_original_interaction_response(&self.http, |response| {
                        if wants_embed(message) {
                            response.set_embed(build_embed(message));
                        } else {
                            response.content(&message.text);
                        }
                        if !message.buttons.is_empty() {
                            response.components(|c| build_buttons(c, &message.buttons));
                        }
                        response
                    })
                    .await?;
            }
            InteractionTarget::Modal(interaction) => {
                interaction
                    .edit_original_interaction_response(&self.http, |response| {
                        if wants_embed(message) {
                            response.set_embed(build_embed(message));
                        } else {
                            response.content(&message.text);
                        }
                        response
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for GatewayChannel {
    async fn reply(&self, message: &ResponseMessage) -> Result<()> {
        self.create_response(InteractionResponseType::ChannelMessageWithSource, message)
            .await
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        match &self.target {
            InteractionTarget::Command(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response.kind(InteractionResponseType::DeferredChannelMessageWithSource);
                        if ephemeral {
                            response.interaction_response_data(|data| data.ephemeral(true));
                        }
                        response
                    })
                    .await?;
            }
            InteractionTarget::Component(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response.kind(InteractionResponseType::DeferredUpdateMessage)
                    })
                    .await?;
            }
            InteractionTarget::Modal(interaction) => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response.kind(InteractionResponseType::DeferredUpdateMessage)
                    })
                    .await?;
            }
        }
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, message: &ResponseMessage) -> Result<()> {
        match &self.target {
            InteractionTarget::Command(interaction) => {
                interaction
                    .create_followup_message(&self.http, |followup| {
                        if wants_embed(message) {
                            followup.set_embed(build_embed(message));
                        } else {
                            followup.content(&message.text);
                        }
                        if message.ephemeral {
                            followup.ephemeral(true);
                        }
                        followup
                    })
                    .await?;
            }
            InteractionTarget::Component(interaction) => {
                interaction
                    .create_followup_message(&self.http, |followup| {
                        if wants_embed(message) {
                            followup.set_embed(build_embed(message));
                        } else {
                            followup.content(&message.text);
                        }
                        if message.ephemeral {
                            followup.ephemeral(true);
                        }
                        followup
                    })
                    .await?;
            }
            InteractionTarget::Modal(interaction) => {
                interaction
                    .create_followup_message(&self.http, |followup| {
                        if wants_embed(message) {
                            followup.set_embed(build_embed(message));
                        } else {
                            followup.content(&message.text);
                        }
                        if message.ephemeral {
                            followup.ephemeral(true);
                        }
                        followup
                    })
                    .await?;
            }
        }
        Ok(())
    }

    async fn edit_reply(&self, message: &ResponseMessage) -> Result<()> {
        let is_component = !matches!(self.target, InteractionTarget::Command(_));
        if is_component && !self.responded.load(Ordering::SeqCst) {
            return self
                .create_response(InteractionResponseType::UpdateMessage, message)
                .await;
        }
        self.edit_original(message).await
    }
}

/// Sort REST failures into the retryable and the hopeless.
fn classify(err: serenity::Error) -> RegistrationError {
    if let serenity::Error::Http(http_err) = &err {
        if let HttpError::UnsuccessfulRequest(response) = http_err.as_ref() {
            let status = response.status_code;
            if status.as_u16() == 429 || status.is_server_error() {
                return RegistrationError::Transient(err.to_string());
            }
            return RegistrationError::Rejected(err.to_string());
        }
    }
    // Connection level failures are worth another try.
    RegistrationError::Transient(err.to_string())
}

/// [`CommandApi`] over the application-command REST endpoints.
pub struct HttpCommandApi {
    http: Arc<Http>,
}

impl HttpCommandApi {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CommandApi for HttpCommandApi {
    async fn bulk_set(
        &self,
        target: RegistrationTarget,
        payload: &Value,
    ) -> Result<usize, RegistrationError> {
        let commands = match target {
            RegistrationTarget::Global => {
                self.http.create_global_application_commands(payload).await
            }
            RegistrationTarget::Guild(guild_id) => {
                self.http
                    .create_guild_application_commands(guild_id, payload)
                    .await
            }
        }
        .map_err(classify)?;
        Ok(commands.len())
    }

    async fn create(
        &self,
        target: RegistrationTarget,
        payload: &Value,
    ) -> Result<(), RegistrationError> {
        match target {
            RegistrationTarget::Global => {
                self.http.create_global_application_command(payload).await
            }
            RegistrationTarget::Guild(guild_id) => {
                self.http
                    .create_guild_application_command(guild_id, payload)
                    .await
            }
        }
        .map_err(classify)?;
        Ok(())
    }

    async fn fetch(
        &self,
        target: RegistrationTarget,
    ) -> Result<Vec<(u64, String)>, RegistrationError> {
        let commands = match target {
            RegistrationTarget::Global => self.http.get_global_application_commands().await,
            RegistrationTarget::Guild(guild_id) => {
                self.http.get_guild_application_commands(guild_id).await
            }
        }
        .map_err(classify)?;
        Ok(commands.into_iter().map(|c| (c.id.0, c.name)).collect())
    }

    async fn delete(
        &self,
        target: RegistrationTarget,
        command_id: u64,
    ) -> Result<(), RegistrationError> {
        match target {
            RegistrationTarget::Global => {
                self.http.delete_global_application_command(command_id).await
            }
            RegistrationTarget::Guild(guild_id) => {
                self.http
                    .delete_guild_application_command(guild_id, command_id)
                    .await
            }
        }
        .map_err(classify)
    }
}

/// Gateway event handler wiring interactions into the dispatcher.
pub struct Handler {
    dispatcher: Arc<Dispatcher>,
    definitions: Vec<CommandDefinition>,
    registration: RegistrationConfig,
    dev_guild: Option<GuildId>,
}

impl Handler {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        definitions: Vec<CommandDefinition>,
        registration: RegistrationConfig,
        dev_guild: Option<GuildId>,
    ) -> Self {
        Self {
            dispatcher,
            definitions,
            registration,
            dev_guild,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        let api = Arc::new(HttpCommandApi::new(Arc::clone(&ctx.http)));
        let manager = RegistrationManager::new(api, self.registration.clone());

        let result = match self.dev_guild {
            Some(guild_id) => {
                info!("🛠️ Registering {} command(s) for development guild {guild_id}", self.definitions.len());
                manager.register_guild(guild_id.0, &self.definitions).await
            }
            None => {
                info!("🌍 Registering {} command(s) globally", self.definitions.len());
                manager
                    .register_all(RegistrationTarget::Global, &self.definitions)
                    .await
            }
        };
        RegistrationManager::log_summary(&result, &self.definitions);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let http = Arc::clone(&ctx.http);
        let (event, channel) = match interaction {
            Interaction::ApplicationCommand(command) => {
                let event = command_event(&command);
                (event, GatewayChannel::command(http, command))
            }
            Interaction::MessageComponent(component) => {
                let event = component_event(&component);
                (event, GatewayChannel::component(http, component))
            }
            Interaction::ModalSubmit(modal) => {
                let event = modal_event(&modal);
                (event, GatewayChannel::modal(http, modal))
            }
            _ => return,
        };

        if let Err(err) = self.dispatcher.dispatch(&event, &channel).await {
            error!("transport failure dispatching '{}': {err:#}", event.identifier);
        }
    }
}
