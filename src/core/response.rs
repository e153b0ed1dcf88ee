//! Platform-agnostic response payloads
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with embed-limit truncation

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;

/// A button attached to a response, identified by its custom-id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageButton {
    pub custom_id: String,
    pub label: String,
}

impl MessageButton {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
        }
    }
}

/// The message shape the dispatcher and handlers speak.
///
/// The gateway adapter turns this into a platform embed (or plain content);
/// the core never touches platform builder types directly, which keeps the
/// dispatch engine testable without a live connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMessage {
    pub title: Option<String>,
    pub text: String,
    pub color: Option<u32>,
    pub ephemeral: bool,
    pub buttons: Vec<MessageButton>,
}

impl ResponseMessage {
    /// Plain text response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Embed-style response with an accent color.
    pub fn embed(title: impl Into<String>, text: impl Into<String>, color: u32) -> Self {
        Self {
            title: Some(title.into()),
            text: truncate_for_embed(&text.into()),
            color: Some(color),
            ..Self::default()
        }
    }

    /// Mark the response as visible only to the invoking user.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Attach action buttons.
    pub fn with_buttons(mut self, buttons: Vec<MessageButton>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Truncate text to fit the embed limit, adding ellipsis if needed
pub fn truncate_for_embed(text: &str) -> String {
    if text.len() <= EMBED_LIMIT {
        text.to_string()
    } else {
        // Find a safe UTF-8 boundary
        let mut end = EMBED_LIMIT - 3; // Room for "..."
        while !text.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
