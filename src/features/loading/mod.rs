//! # Feature: Loading Indicators
//!
//! Visible "still working" feedback for slow handlers. The dispatcher starts
//! an indicator before invoking a handler and stops it afterwards; handlers
//! may stop it early with their own completion text. Stopping is
//! single-writer-wins, so the dispatcher and a handler racing to stop the
//! same indicator produce exactly one terminal edit.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with atomic stop and per-interaction registry

mod indicator;

pub use indicator::{ActiveIndicators, LoadingIndicator, LoadingStyle, StopOutcome};
