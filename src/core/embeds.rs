//! Standard embed builders for dispatcher responses
//!
//! Shared construction for the handful of messages the dispatch engine sends
//! on its own behalf (loading, completion, failure, cooldown notices).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::response::ResponseMessage;

/// Accent colors for dispatcher-owned messages.
pub mod colors {
    /// Blurple, used while a handler is still running.
    pub const PROCESSING: u32 = 0x5865F2;
    pub const SUCCESS: u32 = 0x57F287;
    pub const FAILURE: u32 = 0xED4245;
    pub const COOLDOWN: u32 = 0xFEE75C;
}

/// Initial "still working" message rendered when an indicator goes active.
pub fn processing(text: &str, color: u32) -> ResponseMessage {
    ResponseMessage::embed("Processing", text, color)
}

/// Terminal success message for a stopped indicator.
pub fn completed(text: &str) -> ResponseMessage {
    ResponseMessage::embed("Done", format!("✅ {text}"), colors::SUCCESS)
}

/// Terminal failure message for a stopped indicator.
pub fn failed(text: &str) -> ResponseMessage {
    ResponseMessage::embed("Failed", format!("❌ {text}"), colors::FAILURE)
}

/// Ephemeral notice shown instead of running a command that is on cooldown.
pub fn cooldown_notice(command: &str, remaining_secs: u64) -> ResponseMessage {
    ResponseMessage::embed(
        "Slow down",
        format!("⏳ Please wait {remaining_secs} more second(s) before using `/{command}` again."),
        colors::COOLDOWN,
    )
    .ephemeral()
}

/// Generic user-facing error when no indicator is available to report through.
pub fn generic_error() -> ResponseMessage {
    ResponseMessage::embed(
        "Something went wrong",
        "❌ Sorry, I encountered an error processing your interaction. Please try again.",
        colors::FAILURE,
    )
    .ephemeral()
}
