use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use serde_json::Value;
use tokio::time::sleep;

use super::api::{CommandApi, RegistrationTarget};
use super::definition::CommandDefinition;

/// Tuning knobs for the registration passes.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Bulk attempts per guild before recording a terminal failure.
    pub max_attempts: u32,
    /// First retry delay; doubles on each subsequent attempt.
    pub retry_base_delay: Duration,
    /// Fixed pause between per-item fallback calls.
    pub item_delay: Duration,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(2),
            item_delay: Duration::from_millis(500),
        }
    }
}

/// Outcome of one registration pass against one target.
#[derive(Debug, Clone)]
pub struct RegistrationResult {
    pub target: RegistrationTarget,
    /// Names registered successfully.
    pub registered: Vec<String>,
    /// (name, reason) for each definition that could not be registered.
    pub failed: Vec<(String, String)>,
    /// Set when the pass as a whole could not complete.
    pub error: Option<String>,
}

impl RegistrationResult {
    fn empty(target: RegistrationTarget) -> Self {
        Self {
            target,
            registered: Vec::new(),
            failed: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.failed.is_empty()
    }
}

/// Drives command registration against a [`CommandApi`].
pub struct RegistrationManager {
    api: Arc<dyn CommandApi>,
    config: RegistrationConfig,
}

impl RegistrationManager {
    pub fn new(api: Arc<dyn CommandApi>, config: RegistrationConfig) -> Self {
        Self { api, config }
    }

    fn bulk_payload(definitions: &[CommandDefinition]) -> Value {
        Value::Array(definitions.iter().map(CommandDefinition::to_payload).collect())
    }

    /// Register the full set against one target. Tries a single bulk
    /// overwrite first; on any bulk failure, falls back to paced per-item
    /// registration so one bad definition cannot sink the rest.
    pub async fn register_all(
        &self,
        target: RegistrationTarget,
        definitions: &[CommandDefinition],
    ) -> RegistrationResult {
        let payload = Self::bulk_payload(definitions);
        match self.api.bulk_set(target, &payload).await {
            Ok(count) => {
                info!("bulk-registered {count} command(s) for {target}");
                let mut result = RegistrationResult::empty(target);
                result.registered = definitions.iter().map(|d| d.name.clone()).collect();
                result
            }
            Err(err) => {
                warn!("bulk registration for {target} failed ({err}), falling back to per-item registration");
                self.register_each(target, definitions).await
            }
        }
    }

    /// Register definitions one at a time with a fixed pause between calls.
    /// Failures are recorded per item and never abort the loop.
    pub async fn register_each(
        &self,
        target: RegistrationTarget,
        definitions: &[CommandDefinition],
    ) -> RegistrationResult {
        let mut result = RegistrationResult::empty(target);
        for (index, definition) in definitions.iter().enumerate() {
            if index > 0 {
                sleep(self.config.item_delay).await;
            }
            match self.api.create(target, &definition.to_payload()).await {
                Ok(()) => result.registered.push(definition.name.clone()),
                Err(err) => {
                    error!("failed to register '{}' for {target}: {err}", definition.name);
                    result.failed.push((definition.name.clone(), err.to_string()));
                }
            }
        }
        result
    }

    /// Register the set for several guilds in sequence. A failing guild is
    /// recorded in its own result and never blocks the guilds after it.
    pub async fn register_guilds(
        &self,
        guild_ids: &[u64],
        definitions: &[CommandDefinition],
    ) -> Vec<RegistrationResult> {
        let mut results = Vec::with_capacity(guild_ids.len());
        for &guild_id in guild_ids {
            results.push(self.register_guild(guild_id, definitions).await);
        }
        results
    }

    /// Register against one guild, retrying transient failures with a
    /// doubling delay. A rejected payload skips straight to the per-item
    /// fallback; exhausted retries become a terminal error for this guild.
    pub async fn register_guild(
        &self,
        guild_id: u64,
        definitions: &[CommandDefinition],
    ) -> RegistrationResult {
        let target = RegistrationTarget::Guild(guild_id);
        let payload = Self::bulk_payload(definitions);
        let mut delay = self.config.retry_base_delay;

        for attempt in 1..=self.config.max_attempts {
            match self.api.bulk_set(target, &payload).await {
                Ok(count) => {
                    info!("bulk-registered {count} command(s) for {target} (attempt {attempt})");
                    let mut result = RegistrationResult::empty(target);
                    result.registered = definitions.iter().map(|d| d.name.clone()).collect();
                    return result;
                }
                Err(err) if err.is_transient() && attempt < self.config.max_attempts => {
                    warn!("transient failure registering {target} (attempt {attempt}): {err}; retrying in {delay:?}");
                    sleep(delay).await;
                    delay *= 2;
                }
                Err(err) if !err.is_transient() => {
                    warn!("bulk registration for {target} rejected ({err}), falling back to per-item registration");
                    return self.register_each(target, definitions).await;
                }
                Err(err) => {
                    error!("giving up on {target} after {attempt} attempt(s): {err}");
                    let mut result = RegistrationResult::empty(target);
                    result.error = Some(err.to_string());
                    return result;
                }
            }
        }

        // max_attempts is validated >= 1 by construction; unreachable in practice.
        let mut result = RegistrationResult::empty(target);
        result.error = Some("no registration attempts configured".to_string());
        result
    }

    /// Delete every currently registered command, then register the new set.
    /// Deletion failures are logged and skipped; the stale entry is
    /// overwritten by the registration pass anyway.
    pub async fn replace_all(
        &self,
        target: RegistrationTarget,
        definitions: &[CommandDefinition],
    ) -> RegistrationResult {
        match self.api.fetch(target).await {
            Ok(existing) => {
                for (command_id, name) in existing {
                    if let Err(err) = self.api.delete(target, command_id).await {
                        warn!("could not delete stale command '{name}' ({command_id}) for {target}: {err}");
                    }
                }
            }
            Err(err) => warn!("could not list existing commands for {target}: {err}"),
        }
        self.register_all(target, definitions).await
    }

    /// Log a one-pass summary, flagging grouped commands.
    pub fn log_summary(result: &RegistrationResult, definitions: &[CommandDefinition]) {
        for name in &result.registered {
            let grouped = definitions
                .iter()
                .any(|d| d.name == *name && d.has_subcommands());
            if grouped {
                info!("registered /{name} (with subcommands) for {}", result.target);
            } else {
                info!("registered /{name} for {}", result.target);
            }
        }
        for (name, reason) in &result.failed {
            error!("failed to register /{name} for {}: {reason}", result.target);
        }
        if let Some(err) = &result.error {
            error!("registration for {} did not complete: {err}", result.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::registration::RegistrationError;
    use crate::test_support::MockApi;
    use std::time::Instant;

    fn defs() -> Vec<CommandDefinition> {
        vec![
            CommandDefinition::chat_input("ping", "Round-trip latency"),
            CommandDefinition::chat_input("help", "List commands"),
            CommandDefinition::user_menu("User Info", "Inspect a member"),
        ]
    }

    fn fast_config() -> RegistrationConfig {
        RegistrationConfig {
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(20),
            item_delay: Duration::from_millis(30),
        }
    }

    #[tokio::test]
    async fn test_bulk_success_skips_per_item_calls() {
        let api = Arc::new(MockApi::new());
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager
            .register_all(RegistrationTarget::Global, &defs())
            .await;

        assert!(result.is_success());
        assert_eq!(result.registered.len(), 3);
        assert_eq!(api.bulk_calls().len(), 1);
        assert!(api.create_calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_failure_falls_back_to_per_item() {
        let api = Arc::new(MockApi::new());
        api.script_bulk(Err(RegistrationError::Rejected("bad payload".into())));
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager
            .register_all(RegistrationTarget::Global, &defs())
            .await;

        assert!(result.is_success());
        assert_eq!(api.create_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_per_item_calls_are_paced() {
        let api = Arc::new(MockApi::new());
        api.script_bulk(Err(RegistrationError::Rejected("bad payload".into())));
        let manager = RegistrationManager::new(api.clone(), fast_config());

        manager
            .register_all(RegistrationTarget::Global, &defs())
            .await;

        let calls = api.create_calls();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            let gap = pair[1].at - pair[0].at;
            assert!(gap >= Duration::from_millis(25), "gap was {gap:?}");
        }
    }

    #[tokio::test]
    async fn test_one_bad_item_does_not_abort_the_rest() {
        let api = Arc::new(MockApi::new());
        api.script_bulk(Err(RegistrationError::Rejected("bad payload".into())));
        api.script_create(Ok(()));
        api.script_create(Err(RegistrationError::Rejected("duplicate name".into())));
        api.script_create(Ok(()));
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager
            .register_all(RegistrationTarget::Global, &defs())
            .await;

        assert!(!result.is_success());
        assert_eq!(result.registered, vec!["ping", "User Info"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].0, "help");
    }

    #[tokio::test]
    async fn test_guild_retries_transient_with_growing_delay() {
        let api = Arc::new(MockApi::new());
        api.script_bulk(Err(RegistrationError::Transient("429".into())));
        api.script_bulk(Err(RegistrationError::Transient("502".into())));
        api.script_bulk(Ok(3));
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let start = Instant::now();
        let result = manager.register_guild(100, &defs()).await;

        assert!(result.is_success());
        let calls = api.bulk_calls();
        assert_eq!(calls.len(), 3);
        let gap1 = calls[1].at - calls[0].at;
        let gap2 = calls[2].at - calls[1].at;
        assert!(gap1 >= Duration::from_millis(15), "first gap was {gap1:?}");
        assert!(gap2 > gap1, "delays should grow: {gap1:?} then {gap2:?}");
        // 20ms + 40ms of backoff at minimum.
        assert!(start.elapsed() >= Duration::from_millis(55));
    }

    #[tokio::test]
    async fn test_guild_exhausts_transient_retries() {
        let api = Arc::new(MockApi::new());
        for _ in 0..3 {
            api.script_bulk(Err(RegistrationError::Transient("429".into())));
        }
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager.register_guild(100, &defs()).await;

        assert!(!result.is_success());
        assert!(result.error.is_some());
        assert_eq!(api.bulk_calls().len(), 3);
        assert!(api.create_calls().is_empty());
    }

    #[tokio::test]
    async fn test_guild_rejection_falls_back_without_retrying() {
        let api = Arc::new(MockApi::new());
        api.script_bulk(Err(RegistrationError::Rejected("bad payload".into())));
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager.register_guild(100, &defs()).await;

        assert!(result.is_success());
        assert_eq!(api.bulk_calls().len(), 1);
        assert_eq!(api.create_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_guild_does_not_block_the_next() {
        let api = Arc::new(MockApi::new());
        for _ in 0..3 {
            api.script_bulk(Err(RegistrationError::Transient("429".into())));
        }
        api.script_bulk(Ok(3));
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let results = manager.register_guilds(&[100, 200], &defs()).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].is_success());
        assert!(results[1].is_success());
        assert_eq!(results[1].target, RegistrationTarget::Guild(200));
    }

    #[tokio::test]
    async fn test_replace_all_deletes_then_registers() {
        let api = Arc::new(MockApi::new());
        api.set_fetch_result(vec![(11, "old-ping".into()), (12, "old-help".into())]);
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager
            .replace_all(RegistrationTarget::Global, &defs())
            .await;

        assert!(result.is_success());
        assert_eq!(api.deleted(), vec![11, 12]);
        assert_eq!(api.bulk_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_failures_are_not_fatal() {
        let api = Arc::new(MockApi::new());
        api.set_fetch_result(vec![(11, "old-ping".into())]);
        api.fail_deletes();
        let manager = RegistrationManager::new(api.clone(), fast_config());

        let result = manager
            .replace_all(RegistrationTarget::Global, &defs())
            .await;

        assert!(result.is_success());
        assert_eq!(api.bulk_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_context_menu_payload_has_no_description_on_the_wire() {
        let api = Arc::new(MockApi::new());
        let manager = RegistrationManager::new(api.clone(), fast_config());

        manager
            .register_all(RegistrationTarget::Global, &defs())
            .await;

        let bulk = &api.bulk_calls()[0];
        let items = bulk.payload.as_array().unwrap();
        let menu = items.iter().find(|i| i["name"] == "User Info").unwrap();
        assert!(menu.get("description").is_none());
        let slash = items.iter().find(|i| i["name"] == "ping").unwrap();
        assert!(slash.get("description").is_some());
    }
}
