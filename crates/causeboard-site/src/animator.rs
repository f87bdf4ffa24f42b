#![forbid(unsafe_code)]

//! Scroll animator: rolling counters and reveal latches.
//!
//! Both effects share one "nearly visible" test. Counters run their own
//! Idle → Running → Done machine; reveals are one-way flags. Elements are
//! registered on mount and dropped on unmount, which also cancels any
//! counter still running for them.

use std::collections::BTreeMap;
use std::time::Duration;

use causeboard_core::animation::{CounterTiming, RevealSet, RollingCounter};
use causeboard_core::geometry::VisibilityThreshold;
use causeboard_core::input::{ElementKey, PageMount, ScrollSnapshot};

/// What one scroll snapshot changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observed {
    pub started: Vec<ElementKey>,
    pub revealed: Vec<ElementKey>,
}

impl Observed {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.revealed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    threshold: VisibilityThreshold,
    timing: CounterTiming,
    counters: BTreeMap<ElementKey, RollingCounter>,
    reveals: RevealSet,
}

impl ScrollAnimator {
    #[must_use]
    pub fn new(threshold: VisibilityThreshold, timing: CounterTiming) -> Self {
        Self {
            threshold,
            timing,
            counters: BTreeMap::new(),
            reveals: RevealSet::new(),
        }
    }

    /// Register mounted elements. Keys already tracked keep their state.
    pub fn mount(&mut self, mount: &PageMount) {
        for counter in &mount.counters {
            self.counters
                .entry(counter.key.clone())
                .or_insert_with(|| {
                    RollingCounter::from_attr(counter.target.as_deref(), &self.timing)
                });
        }
        for key in &mount.reveals {
            self.reveals.track(key.clone());
        }
        tracing::debug!(
            counters = self.counters.len(),
            reveals = self.reveals.len(),
            "page mounted"
        );
    }

    /// Apply a measurement snapshot.
    pub fn observe(&mut self, snapshot: &ScrollSnapshot) -> Observed {
        let mut started = Vec::new();
        for probe in &snapshot.tops {
            let Some(counter) = self.counters.get_mut(&probe.key) else {
                continue;
            };
            if self
                .threshold
                .is_nearly_visible(probe.top, snapshot.viewport_height)
                && counter.start()
            {
                started.push(probe.key.clone());
            }
        }
        let revealed = self.reveals.observe(snapshot, &self.threshold);
        Observed { started, revealed }
    }

    /// Advance counter `key` one step. Returns whether its display changed.
    pub fn tick(&mut self, key: &ElementKey) -> bool {
        self.counters.get_mut(key).is_some_and(RollingCounter::tick)
    }

    /// Forget an element. Returns whether it was tracked.
    pub fn unmount(&mut self, key: &ElementKey) -> bool {
        let had_counter = self.counters.remove(key).is_some();
        let had_reveal = self.reveals.forget(key);
        if had_counter || had_reveal {
            tracing::debug!(element = %key, "element unmounted");
        }
        had_counter || had_reveal
    }

    /// Counters that still want ticks, with their tick interval.
    pub fn running(&self) -> impl Iterator<Item = (&ElementKey, Duration)> {
        self.counters
            .iter()
            .filter(|(_, c)| c.is_running())
            .map(|(key, c)| (key, c.plan().interval))
    }

    /// Current display text of every started counter.
    pub fn displays(&self) -> impl Iterator<Item = (&ElementKey, String)> {
        self.counters
            .iter()
            .filter_map(|(key, c)| c.display().map(|text| (key, text)))
    }

    pub fn revealed(&self) -> impl Iterator<Item = &ElementKey> {
        self.reveals.revealed()
    }

    #[must_use]
    pub fn counter(&self, key: &ElementKey) -> Option<&RollingCounter> {
        self.counters.get(key)
    }
}
