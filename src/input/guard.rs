use std::time::{Duration, Instant};

/// Swallows repeat activations that arrive within `cooldown` of the last
/// accepted one, so one click on nested click targets fires once.
#[derive(Debug, Clone)]
pub struct ActivationGuard {
    cooldown: Duration,
    last: Option<Instant>,
}

impl ActivationGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
        }
    }

    pub fn try_activate(&mut self, now: Instant) -> bool {
        if self.is_cooling_down(now) {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Restarts the cooldown at `now`, e.g. when a modal opened by the last
    /// activation returns. Clicks queued behind the modal stay swallowed.
    pub fn rearm(&mut self, now: Instant) {
        self.last = Some(now);
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        matches!(self.last, Some(last) if now.saturating_duration_since(last) < self.cooldown)
    }
}
