//! Transient "saved" notice.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// How long the notice stays up after a save.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Notice state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeState {
    Idle,
    Saved { since: DateTime<Utc> },
}

/// `Idle -> Saved -> Idle` once the duration has elapsed.
#[derive(Debug, Clone)]
pub struct SaveNotice {
    state: NoticeState,
    duration: Duration,
}

impl SaveNotice {
    pub const MESSAGE: &'static str = "Case record saved successfully";

    pub fn new(duration: Duration) -> Self {
        Self {
            state: NoticeState::Idle,
            duration,
        }
    }

    pub fn state(&self) -> NoticeState {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Enter `Saved`. A second save restarts the clock.
    pub fn mark_saved(&mut self, now: DateTime<Utc>) {
        self.state = NoticeState::Saved { since: now };
    }

    /// Return to `Idle` if the notice has expired. Returns true on transition.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            NoticeState::Saved { since } if self.expired(since, now) => {
                self.state = NoticeState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Whether the notice should be shown at `now`.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        match self.state {
            NoticeState::Idle => false,
            NoticeState::Saved { since } => !self.expired(since, now),
        }
    }

    /// The notice text, if visible.
    pub fn message(&self, now: DateTime<Utc>) -> Option<&'static str> {
        self.is_visible(now).then_some(Self::MESSAGE)
    }

    fn expired(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let elapsed = now.timestamp_millis().saturating_sub(since.timestamp_millis());
        let limit = i64::try_from(self.duration.as_millis()).unwrap_or(i64::MAX);
        elapsed >= limit
    }
}

impl Default for SaveNotice {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}
