//! # Features Module
//!
//! Self-contained behaviors the dispatch engine composes: per-user command
//! cooldowns, loading indicators for slow handlers, and startup command
//! registration.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

pub mod cooldown;
pub mod loading;
pub mod registration;

pub use cooldown::CooldownTracker;
pub use loading::{ActiveIndicators, LoadingIndicator, LoadingStyle, StopOutcome};
pub use registration::{RegistrationConfig, RegistrationManager, RegistrationResult};
