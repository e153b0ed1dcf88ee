//! Environment-based configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with registration tuning knobs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::features::registration::RegistrationConfig;

/// Runtime configuration loaded from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token for the gateway connection.
    pub discord_token: String,
    /// Optional development guild; when set, commands register per-guild
    /// (instant) instead of globally (cached up to an hour by the platform).
    pub discord_guild_id: Option<String>,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Default per-user command cooldown, applied when a handler declares none.
    pub default_cooldown_secs: u64,
    /// Fixed delay between per-item registration calls.
    pub registration_item_delay_ms: u64,
    /// Base delay for the guild registration retry loop (doubles per attempt).
    pub registration_retry_base_ms: u64,
    /// Maximum bulk attempts per guild before recording a terminal failure.
    pub registration_max_attempts: u32,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Only `DISCORD_TOKEN` is required; everything else has a sensible
    /// default.
    pub fn from_env() -> Result<Self> {
        let discord_token = env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN must be set (bot token from the developer portal)")?;

        Ok(Config {
            discord_token,
            discord_guild_id: env::var("DISCORD_GUILD_ID").ok().filter(|v| !v.is_empty()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            default_cooldown_secs: parse_or(env::var("DEFAULT_COOLDOWN_SECS").ok(), 3),
            registration_item_delay_ms: parse_or(env::var("REGISTRATION_ITEM_DELAY_MS").ok(), 500),
            registration_retry_base_ms: parse_or(env::var("REGISTRATION_RETRY_BASE_MS").ok(), 2000),
            registration_max_attempts: parse_or(env::var("REGISTRATION_MAX_ATTEMPTS").ok(), 3),
        })
    }

    /// Registration tuning derived from the environment knobs.
    pub fn registration(&self) -> RegistrationConfig {
        RegistrationConfig {
            max_attempts: self.registration_max_attempts,
            retry_base_delay: Duration::from_millis(self.registration_retry_base_ms),
            item_delay: Duration::from_millis(self.registration_item_delay_ms),
        }
    }
}

/// Parse an optional env value, falling back to `default` when the variable
/// is missing or malformed.
fn parse_or<T: FromStr + Copy>(value: Option<String>, default: T) -> T {
    value
        .as_deref()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_missing_uses_default() {
        assert_eq!(parse_or::<u64>(None, 3), 3);
    }

    #[test]
    fn test_parse_or_malformed_uses_default() {
        assert_eq!(parse_or::<u64>(Some("not-a-number".to_string()), 3), 3);
    }

    #[test]
    fn test_parse_or_valid_value() {
        assert_eq!(parse_or::<u32>(Some("7".to_string()), 3), 7);
    }
}
