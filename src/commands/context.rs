//! Shared context for interaction handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::features::loading::ActiveIndicators;
use crate::store::SettingsStore;

/// Dependencies shared by every handler invocation.
///
/// Cheap to clone behind an `Arc`; one instance lives for the whole process.
pub struct SharedContext {
    /// Guild settings persistence.
    pub store: Arc<dyn SettingsStore>,
    /// Active loading indicators, for handlers that stop theirs early with
    /// custom completion text.
    pub indicators: Arc<ActiveIndicators>,
    start_time: Instant,
}

impl SharedContext {
    pub fn new(store: Arc<dyn SettingsStore>, indicators: Arc<ActiveIndicators>) -> Self {
        Self {
            store,
            indicators,
            start_time: Instant::now(),
        }
    }

    /// Process uptime, for status style commands.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
