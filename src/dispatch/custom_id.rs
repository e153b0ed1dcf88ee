//! Custom-id parsing for component interactions
//!
//! Components carry an opaque `ownerToken-action[-payload]` string joined by
//! a fixed delimiter. The owner token selects the handler; the action and
//! optional payload are for the handler to interpret.

use std::fmt;

/// Fixed delimiter between custom-id segments.
pub const SEPARATOR: char = '-';

/// A parsed component custom-id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomId {
    pub owner: String,
    pub action: String,
    pub payload: Option<String>,
}

impl CustomId {
    pub fn new(owner: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            action: action.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Parse a raw custom-id. Returns `None` when the string does not have at
    /// least an owner and an action segment; callers treat that as a stale
    /// component and drop it silently.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, SEPARATOR);
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let action = parts.next().filter(|s| !s.is_empty())?;
        let payload = parts.next().map(str::to_string);
        Some(Self {
            owner: owner.to_string(),
            action: action.to_string(),
            payload,
        })
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.owner, SEPARATOR, self.action)?;
        if let Some(payload) = &self.payload {
            write!(f, "{SEPARATOR}{payload}")?;
        }
        Ok(())
    }
}
