use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use crate::detection::DetectionEvent;
use crate::filter::clock::{Clock, SystemClock};
use crate::prelude::FilterStage;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(2000);

/// Suppresses repeated detections of a code within a fixed cooldown window.
///
/// Accepting a code schedules its expiry at `now + cooldown`. Pending
/// expiries are keyed by code, so they can be cancelled one at a time or all
/// at once when a session is torn down. Rejections leave the deadline alone.
pub struct DebounceStage<C: Clock = SystemClock> {
    cooldown: Duration,
    suppressed: HashMap<String, Instant>,
    clock: C,
}

impl DebounceStage<SystemClock> {
    pub fn new(cooldown: Duration) -> Self {
        Self::with_clock(cooldown, SystemClock)
    }
}

impl Default for DebounceStage<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl<C: Clock> DebounceStage<C> {
    pub fn with_clock(cooldown: Duration, clock: C) -> Self {
        Self {
            cooldown,
            suppressed: HashMap::new(),
            clock,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_suppressed(&self, code: &str) -> bool {
        let now = self.clock.now();
        self.suppressed
            .get(code)
            .is_some_and(|deadline| *deadline > now)
    }

    /// Number of codes still inside their cooldown window.
    pub fn suppressed_len(&self) -> usize {
        let now = self.clock.now();
        self.suppressed
            .values()
            .filter(|deadline| **deadline > now)
            .count()
    }

    /// Earliest pending expiry, if any code is suppressed.
    pub fn next_expiry(&self) -> Option<Instant> {
        let now = self.clock.now();
        self.suppressed
            .values()
            .copied()
            .filter(|deadline| *deadline > now)
            .min()
    }

    /// Cancels the pending expiry for `code`, releasing it immediately.
    pub fn cancel(&mut self, code: &str) -> bool {
        self.suppressed.remove(code).is_some()
    }

    /// Cancels every pending expiry.
    pub fn clear(&mut self) {
        self.suppressed.clear();
    }

    fn purge_expired(&mut self, now: Instant) {
        self.suppressed.retain(|_, deadline| *deadline > now);
    }
}

impl<C: Clock> FilterStage for DebounceStage<C> {
    fn filter(&mut self, event: DetectionEvent) -> Option<DetectionEvent> {
        let now = self.clock.now();
        self.purge_expired(now);

        if self.suppressed.contains_key(&event.code) {
            debug!("debounce: {} still cooling down", event.code);
            return None;
        }

        self.suppressed
            .insert(event.code.clone(), now + self.cooldown);
        Some(event)
    }

    fn name(&self) -> &'static str {
        "debounce"
    }
}
