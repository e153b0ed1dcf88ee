//! # Store Module
//!
//! Guild settings persistence behind a small async trait. The default
//! implementation is in-memory; swapping in a database-backed store only
//! requires implementing [`SettingsStore`].
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Settings for one guild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub guild_id: u64,
    /// Free-form settings object, navigated by dotted paths.
    pub settings: Value,
    pub created_at: DateTime<Utc>,
}

impl SettingsRecord {
    fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            settings: json!({}),
            created_at: Utc::now(),
        }
    }
}

/// Persistence surface for guild settings.
///
/// Paths are dot-separated keys into the settings object ("setup.channel").
/// An empty path addresses the whole object.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the record for a guild, creating an empty one if missing.
    async fn find_or_create(&self, guild_id: u64) -> Result<SettingsRecord>;

    /// Read the value at a dotted path, `None` if any segment is missing.
    async fn get(&self, guild_id: u64, path: &str) -> Result<Option<Value>>;

    /// Write the value at a dotted path, creating intermediate objects.
    async fn update(&self, guild_id: u64, path: &str, value: Value) -> Result<()>;
}

/// In-memory settings store backed by DashMap.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<u64, SettingsRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn find_or_create(&self, guild_id: u64) -> Result<SettingsRecord> {
        let record = self
            .records
            .entry(guild_id)
            .or_insert_with(|| SettingsRecord::new(guild_id));
        Ok(record.clone())
    }

    async fn get(&self, guild_id: u64, path: &str) -> Result<Option<Value>> {
        let record = match self.records.get(&guild_id) {
            Some(record) => record,
            None => return Ok(None),
        };
        if path.is_empty() {
            return Ok(Some(record.settings.clone()));
        }
        let mut current = &record.settings;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current.clone()))
    }

    async fn update(&self, guild_id: u64, path: &str, value: Value) -> Result<()> {
        let mut record = self
            .records
            .entry(guild_id)
            .or_insert_with(|| SettingsRecord::new(guild_id));
        if path.is_empty() {
            record.settings = value;
            return Ok(());
        }
        if !record.settings.is_object() {
            record.settings = json!({});
        }
        let mut current = &mut record.settings;
        let segments: Vec<&str> = path.split('.').collect();
        for segment in &segments[..segments.len() - 1] {
            if !current.get(*segment).map(Value::is_object).unwrap_or(false) {
                current[*segment] = json!({});
            }
            current = &mut current[*segment];
        }
        current[segments[segments.len() - 1]] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUILD: u64 = 100;

    #[tokio::test]
    async fn test_find_or_create_returns_empty_settings() {
        let store = MemoryStore::new();
        let record = store.find_or_create(GUILD).await.unwrap();
        assert_eq!(record.guild_id, GUILD);
        assert_eq!(record.settings, json!({}));
    }

    #[tokio::test]
    async fn test_update_and_get_nested_path() {
        let store = MemoryStore::new();
        store
            .update(GUILD, "setup.channel", json!("12345"))
            .await
            .unwrap();
        store
            .update(GUILD, "setup.style", json!("compact"))
            .await
            .unwrap();

        assert_eq!(
            store.get(GUILD, "setup.channel").await.unwrap(),
            Some(json!("12345"))
        );
        assert_eq!(
            store.get(GUILD, "setup").await.unwrap(),
            Some(json!({"channel": "12345", "style": "compact"}))
        );
    }

    #[tokio::test]
    async fn test_get_missing_segment_is_none() {
        let store = MemoryStore::new();
        store.update(GUILD, "setup.channel", json!("1")).await.unwrap();
        assert_eq!(store.get(GUILD, "setup.missing").await.unwrap(), None);
        assert_eq!(store.get(GUILD + 1, "setup").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_path_replaces_whole_object() {
        let store = MemoryStore::new();
        store.update(GUILD, "setup.channel", json!("1")).await.unwrap();
        store.update(GUILD, "", json!({})).await.unwrap();
        assert_eq!(store.get(GUILD, "").await.unwrap(), Some(json!({})));
        assert_eq!(store.get(GUILD, "setup.channel").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_overwrites_scalar_with_object() {
        let store = MemoryStore::new();
        store.update(GUILD, "setup", json!("flat")).await.unwrap();
        store
            .update(GUILD, "setup.channel", json!("1"))
            .await
            .unwrap();
        assert_eq!(
            store.get(GUILD, "setup.channel").await.unwrap(),
            Some(json!("1"))
        );
    }
}
