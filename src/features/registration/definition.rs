//! Platform-agnostic command definitions
//!
//! `CommandDefinition` serializes straight into the application-command JSON
//! the REST API accepts, so the registration path never touches platform
//! builder types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application command types as the platform numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Slash command.
    ChatInput = 1,
    /// User context menu entry.
    User = 2,
    /// Message context menu entry.
    Message = 3,
}

impl CommandKind {
    pub fn is_context_menu(self) -> bool {
        matches!(self, CommandKind::User | CommandKind::Message)
    }
}

impl Serialize for CommandKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for CommandKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(CommandKind::ChatInput),
            2 => Ok(CommandKind::User),
            3 => Ok(CommandKind::Message),
            other => Err(serde::de::Error::custom(format!(
                "unknown command type {other}"
            ))),
        }
    }
}

/// One command to register, in wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: CommandKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_member_permissions: Option<String>,
}

impl CommandDefinition {
    pub fn chat_input(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            kind: CommandKind::ChatInput,
            options: Vec::new(),
            default_member_permissions: None,
        }
    }

    /// User context menu entry. Context menus carry no description on the
    /// wire, but keeping one here feeds `/help` and the registration summary.
    pub fn user_menu(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            kind: CommandKind::User,
            options: Vec::new(),
            default_member_permissions: None,
        }
    }

    /// Message context menu entry.
    pub fn message_menu(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            kind: CommandKind::Message,
            options: Vec::new(),
            default_member_permissions: None,
        }
    }

    /// Append a raw option object (options, subcommands, groups).
    pub fn option(mut self, option: Value) -> Self {
        self.options.push(option);
        self
    }

    /// Restrict to members holding the given permission bit set.
    pub fn permissions(mut self, bits: impl Into<String>) -> Self {
        self.default_member_permissions = Some(bits.into());
        self
    }

    /// True when any option is a subcommand or subcommand group.
    pub fn has_subcommands(&self) -> bool {
        self.options.iter().any(|opt| {
            matches!(opt.get("type").and_then(Value::as_u64), Some(1) | Some(2))
        })
    }

    /// Wire payload for the REST API. Context menu definitions must not
    /// carry a `description` field; the API rejects them if they do.
    pub fn to_payload(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if self.kind.is_context_menu() {
            if let Some(object) = value.as_object_mut() {
                object.remove("description");
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_input_payload_keeps_description() {
        let payload = CommandDefinition::chat_input("ping", "Round-trip latency").to_payload();
        assert_eq!(payload["name"], "ping");
        assert_eq!(payload["description"], "Round-trip latency");
        assert_eq!(payload["type"], 1);
        assert!(payload.get("options").is_none());
    }

    #[test]
    fn test_context_menu_payload_strips_description() {
        let def = CommandDefinition::user_menu("User Info", "Inspect a member");
        assert_eq!(def.description.as_deref(), Some("Inspect a member"));

        let payload = def.to_payload();
        assert!(payload.get("description").is_none());
        assert_eq!(payload["type"], 2);
    }

    #[test]
    fn test_subcommand_detection() {
        let plain = CommandDefinition::chat_input("ping", "Latency")
            .option(json!({"type": 3, "name": "target", "description": "Who"}));
        assert!(!plain.has_subcommands());

        let nested = CommandDefinition::chat_input("setup", "Configure")
            .option(json!({"type": 1, "name": "start", "description": "Begin"}));
        assert!(nested.has_subcommands());
    }

    #[test]
    fn test_permissions_serialize() {
        let payload = CommandDefinition::chat_input("reset", "Wipe settings")
            .permissions("8")
            .to_payload();
        assert_eq!(payload["default_member_permissions"], "8");
    }
}
