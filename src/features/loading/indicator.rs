use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use log::warn;

use crate::core::embeds;
use crate::dispatch::channel::NotificationChannel;
use crate::dispatch::event::InteractionEvent;

/// Visual flavor of the processing message. Handlers pick one; the dispatcher
/// defaults to `Dots`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStyle {
    Dots,
    Pulse,
    Gear,
}

impl LoadingStyle {
    pub fn glyph(self) -> &'static str {
        match self {
            LoadingStyle::Dots => "⏳",
            LoadingStyle::Pulse => "💠",
            LoadingStyle::Gear => "⚙️",
        }
    }
}

/// How an indicator ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Success,
    Failure,
}

/// One loading indicator, bound to a single interaction.
///
/// `stopped` flips exactly once; whoever swaps it first owns the terminal
/// edit. Later stop attempts return `Ok(false)` without touching the channel.
#[derive(Debug)]
pub struct LoadingIndicator {
    pub interaction_id: u64,
    pub text: String,
    pub style: LoadingStyle,
    pub color: u32,
    stopped: AtomicBool,
}

impl LoadingIndicator {
    pub fn new(interaction_id: u64, text: impl Into<String>, style: LoadingStyle, color: u32) -> Self {
        Self {
            interaction_id,
            text: text.into(),
            style,
            color,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Render the initial processing message. Uses `reply` when the
    /// interaction is still unanswered, `edit_reply` when it was deferred.
    pub async fn begin(
        &self,
        event: &InteractionEvent,
        channel: &dyn NotificationChannel,
    ) -> Result<()> {
        let message = embeds::processing(&format!("{} {}", self.style.glyph(), self.text), self.color);
        if event.has_responded() {
            channel.edit_reply(&message).await
        } else {
            channel.reply(&message).await?;
            event.mark_replied();
            Ok(())
        }
    }

    /// Stop the indicator with a terminal edit. Returns `Ok(true)` if this
    /// call performed the edit, `Ok(false)` if the indicator was already
    /// stopped.
    pub async fn stop(
        &self,
        channel: &dyn NotificationChannel,
        outcome: StopOutcome,
        text: &str,
    ) -> Result<bool> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        let message = match outcome {
            StopOutcome::Success => embeds::completed(text),
            StopOutcome::Failure => embeds::failed(text),
        };
        channel.edit_reply(&message).await?;
        Ok(true)
    }
}

/// All indicators currently active, keyed by interaction id.
///
/// Shared between the dispatcher (which starts and finishes indicators) and
/// handlers (which may stop one early through `SharedContext`).
#[derive(Default)]
pub struct ActiveIndicators {
    indicators: DashMap<u64, Arc<LoadingIndicator>>,
}

impl ActiveIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an indicator. Replacing an existing entry for the same
    /// interaction means the dispatcher double-started one; logged, not
    /// fatal.
    pub fn register(&self, indicator: Arc<LoadingIndicator>) {
        let id = indicator.interaction_id;
        if self.indicators.insert(id, indicator).is_some() {
            warn!("replaced an active loading indicator for interaction {id}");
        }
    }

    pub fn get(&self, interaction_id: u64) -> Option<Arc<LoadingIndicator>> {
        self.indicators.get(&interaction_id).map(|entry| entry.clone())
    }

    pub fn remove(&self, interaction_id: u64) -> Option<Arc<LoadingIndicator>> {
        self.indicators.remove(&interaction_id).map(|(_, v)| v)
    }

    /// Stop and untrack the indicator for an interaction. Returns `Ok(false)`
    /// when no indicator is active or it was already stopped.
    pub async fn stop(
        &self,
        interaction_id: u64,
        channel: &dyn NotificationChannel,
        outcome: StopOutcome,
        text: &str,
    ) -> Result<bool> {
        match self.remove(interaction_id) {
            Some(indicator) => indicator.stop(channel, outcome, text).await,
            None => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::event::InteractionKind;
    use crate::test_support::RecordingChannel;

    fn indicator(id: u64) -> LoadingIndicator {
        LoadingIndicator::new(id, "Working on it...", LoadingStyle::Dots, embeds::colors::PROCESSING)
    }

    #[tokio::test]
    async fn test_begin_on_fresh_event_replies_and_marks() {
        let event = InteractionEvent::new(1, InteractionKind::Command, "slow", 42);
        let channel = RecordingChannel::new();

        indicator(1).begin(&event, &channel).await.unwrap();

        assert_eq!(channel.replies().len(), 1);
        assert!(channel.edits().is_empty());
        assert!(event.replied());
        assert!(channel.replies()[0].text.contains("Working on it"));
    }

    #[tokio::test]
    async fn test_begin_on_deferred_event_edits() {
        let event = InteractionEvent::new(2, InteractionKind::Command, "slow", 42);
        event.mark_deferred();
        let channel = RecordingChannel::new();

        indicator(2).begin(&event, &channel).await.unwrap();

        assert!(channel.replies().is_empty());
        assert_eq!(channel.edits().len(), 1);
    }

    #[tokio::test]
    async fn test_double_stop_edits_once() {
        let channel = RecordingChannel::new();
        let ind = indicator(3);

        assert!(ind.stop(&channel, StopOutcome::Success, "done").await.unwrap());
        assert!(!ind.stop(&channel, StopOutcome::Failure, "late").await.unwrap());

        let edits = channel.edits();
        assert_eq!(edits.len(), 1);
        assert!(edits[0].text.contains("done"));
    }

    #[tokio::test]
    async fn test_stop_marks_stopped_even_when_edit_fails() {
        let channel = RecordingChannel::failing_edits();
        let ind = indicator(4);

        assert!(ind.stop(&channel, StopOutcome::Success, "done").await.is_err());
        assert!(ind.is_stopped());
        // A retry after the failed edit does not edit again.
        assert!(!ind.stop(&channel, StopOutcome::Success, "done").await.unwrap());
    }

    #[tokio::test]
    async fn test_registry_stop_removes_entry() {
        let channel = RecordingChannel::new();
        let active = ActiveIndicators::new();
        active.register(Arc::new(indicator(5)));
        assert_eq!(active.len(), 1);

        assert!(active
            .stop(5, &channel, StopOutcome::Success, "done")
            .await
            .unwrap());
        assert!(active.is_empty());

        // Stopping an unknown interaction is a quiet no-op.
        assert!(!active
            .stop(5, &channel, StopOutcome::Success, "done")
            .await
            .unwrap());
        assert_eq!(channel.edits().len(), 1);
    }
}
