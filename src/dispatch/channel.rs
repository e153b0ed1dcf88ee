//! Notification channel abstraction
//!
//! The narrow surface the dispatch engine uses to talk back to the platform.
//! The serenity-backed implementation lives in `crate::gateway`; tests use a
//! recording double. Calling `reply` twice on the same interaction is a
//! platform contract violation, which is why the dispatcher alone decides
//! between `reply`, `follow_up`, and `edit_reply` based on the event's
//! response state.

use anyhow::Result;
use async_trait::async_trait;

use crate::core::response::ResponseMessage;

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Send the initial response. Valid at most once per interaction.
    async fn reply(&self, message: &ResponseMessage) -> Result<()>;

    /// Acknowledge without content, buying time for a slow handler.
    async fn defer(&self, ephemeral: bool) -> Result<()>;

    /// Send an additional message after the initial response.
    async fn follow_up(&self, message: &ResponseMessage) -> Result<()>;

    /// Edit the initial response in place.
    async fn edit_reply(&self, message: &ResponseMessage) -> Result<()>;
}
