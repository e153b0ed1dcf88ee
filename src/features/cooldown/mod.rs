//! # Feature: Command Cooldowns
//!
//! Per-user cooldowns on slash commands backed by DashMap for thread-safe
//! concurrent access. Keys are (command, user) pairs so the same user can
//! run different commands back to back. Components and modals are never
//! subject to cooldowns.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with per-(command, user) expiry tracking

mod tracker;

pub use tracker::CooldownTracker;
