//! Built-in command definitions
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial command set with setup subcommands and context menus

use log::warn;
use serde_json::json;

use crate::features::registration::CommandDefinition;

/// All commands shipped with the bot, in registration order.
pub fn create_command_definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::chat_input("ping", "Check that the bot is responsive"),
        CommandDefinition::chat_input("help", "List available commands"),
        CommandDefinition::chat_input("setup", "Configure the bot for this server")
            .option(json!({
                "type": 1,
                "name": "start",
                "description": "Start the guided setup wizard"
            }))
            .option(json!({
                "type": 1,
                "name": "show",
                "description": "Show the current configuration"
            }))
            .permissions("32"),
        CommandDefinition::chat_input("reset", "Wipe this server's configuration").permissions("32"),
        CommandDefinition::user_menu("User Info", "Show details about a member"),
        CommandDefinition::message_menu("Quote Message", "Quote a message back to the channel"),
    ]
}

/// Merge definition lists from several sources into one registration set.
///
/// Duplicate names keep the first definition seen; later ones are dropped
/// with a warning so a misconfigured source cannot silently shadow another.
pub fn load_definitions(sources: Vec<Vec<CommandDefinition>>) -> Vec<CommandDefinition> {
    let mut merged: Vec<CommandDefinition> = Vec::new();
    for source in sources {
        for definition in source {
            if let Some(existing) = merged.iter().find(|d| d.name == definition.name) {
                warn!(
                    "duplicate command definition '{}' dropped (kept {:?} variant)",
                    definition.name, existing.kind
                );
                continue;
            }
            merged.push(definition);
        }
    }
    merged
}
