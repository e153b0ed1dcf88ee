use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Composite key: (command name, user id). Cooldowns are scoped per user and
/// per command, never globally.
type CooldownKey = (String, u64);

/// Clones share the same underlying map, so a background sweep task and the
/// dispatcher see one set of entries.
#[derive(Clone)]
pub struct CooldownTracker {
    entries: Arc<DashMap<CooldownKey, Instant>>,
    default_cooldown: Duration,
}

impl CooldownTracker {
    pub fn new(default_cooldown: Duration) -> Self {
        CooldownTracker {
            entries: Arc::new(DashMap::new()),
            default_cooldown,
        }
    }

    /// The cooldown applied when a handler does not declare its own.
    pub fn default_cooldown(&self) -> Duration {
        self.default_cooldown
    }

    fn make_key(command: &str, user_id: u64) -> CooldownKey {
        (command.to_string(), user_id)
    }

    /// Returns the remaining cooldown if the user is still rate limited,
    /// `None` if the command may run. Expired entries are removed lazily.
    pub fn check(&self, command: &str, user_id: u64) -> Option<Duration> {
        let key = Self::make_key(command, user_id);
        let now = Instant::now();

        if let Some(expiry) = self.entries.get(&key) {
            if *expiry > now {
                return Some(*expiry - now);
            }
        }

        self.entries.remove(&key);
        None
    }

    /// Start a cooldown for the pair. A zero duration arms nothing.
    pub fn arm(&self, command: &str, user_id: u64, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.entries
            .insert(Self::make_key(command, user_id), Instant::now() + duration);
    }

    /// Drop every expired entry. Called opportunistically; `check` already
    /// removes stale entries on the hot path.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, expiry| *expiry > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
