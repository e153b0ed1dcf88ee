use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use switchboard::commands::handlers::create_all_handlers;
use switchboard::commands::{create_command_definitions, load_definitions};
use switchboard::core::Config;
use switchboard::features::loading::ActiveIndicators;
use switchboard::gateway;
use switchboard::store::MemoryStore;
use switchboard::{CooldownTracker, Dispatcher, HandlerRegistry, SharedContext};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Switchboard...");

    let store = Arc::new(MemoryStore::new());
    let indicators = Arc::new(ActiveIndicators::new());
    let ctx = Arc::new(SharedContext::new(store, indicators));

    let mut registry = HandlerRegistry::new();
    for handler in create_all_handlers() {
        registry.register(handler);
    }
    info!("📋 {} command name(s) registered for dispatch", registry.len());

    let cooldowns = CooldownTracker::new(Duration::from_secs(config.default_cooldown_secs));

    // Periodic sweep so expired cooldown entries cannot accumulate
    let sweeper = cooldowns.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            sweeper.sweep();
        }
    });

    let dispatcher = Arc::new(Dispatcher::new(registry, cooldowns, ctx));

    let definitions = load_definitions(vec![create_command_definitions()]);

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = gateway::Handler::new(
        dispatcher,
        definitions,
        config.registration(),
        guild_id,
    );

    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid bot token format");
            error!("  - Network issues reaching Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        error!("This could be due to:");
        error!("  - Invalid bot token");
        error!("  - Network connectivity issues");
        error!("  - Discord API outage");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
