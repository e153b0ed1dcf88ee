//! # Built-in Handlers
//!
//! The handlers shipped with the bot. `create_all_handlers` is the single
//! place new handlers get wired in.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

pub mod context_menu;
pub mod setup;
pub mod utility;

use std::sync::Arc;

use super::handler::InteractionHandler;
pub use context_menu::ContextMenuHandler;
pub use setup::{ResetFlow, SetupWizard, RESET_OWNER, SETUP_OWNER};
pub use utility::UtilityHandler;

/// Instantiate every built-in handler.
pub fn create_all_handlers() -> Vec<Arc<dyn InteractionHandler>> {
    vec![
        Arc::new(UtilityHandler),
        Arc::new(SetupWizard),
        Arc::new(ResetFlow),
        Arc::new(ContextMenuHandler),
    ]
}
