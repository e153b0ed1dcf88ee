//! Dispatch error taxonomy
//!
//! Splits the failure modes the dispatcher reacts to differently: unknown
//! routes are dropped silently, cooldown rejections get a notice, handler
//! faults get the full error treatment.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler registered for a command or context menu name.
    #[error("no handler registered for '{0}'")]
    HandlerNotFound(String),

    /// The command is still rate limited for this user.
    #[error("cooldown active for '{command}' ({remaining:?} remaining)")]
    CooldownActive { command: String, remaining: Duration },

    /// A component or modal whose custom id no longer routes anywhere,
    /// typically from a message that outlived its handler.
    #[error("stale component custom id '{0}'")]
    StaleComponent(String),

    /// The handler itself returned an error.
    #[error("handler '{identifier}' failed")]
    HandlerFault {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },
}
