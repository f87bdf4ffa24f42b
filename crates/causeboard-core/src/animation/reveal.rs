#![forbid(unsafe_code)]

//! Scroll reveal latches.
//!
//! Each tracked element starts hidden and flips to revealed the first time a
//! scroll snapshot shows it nearly visible. There is no way back.

use std::collections::BTreeMap;

use crate::geometry::VisibilityThreshold;
use crate::input::{ElementKey, ScrollSnapshot};

/// Reveal state for every tracked element, keyed by element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealSet {
    revealed: BTreeMap<ElementKey, bool>,
}

impl RevealSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `key`. Re-tracking keeps any existing latch.
    pub fn track(&mut self, key: ElementKey) {
        self.revealed.entry(key).or_insert(false);
    }

    /// Stop tracking `key`.
    pub fn forget(&mut self, key: &ElementKey) -> bool {
        self.revealed.remove(key).is_some()
    }

    /// Apply a snapshot; returns the keys revealed by this call.
    ///
    /// Measurements for untracked keys are ignored.
    pub fn observe(
        &mut self,
        snapshot: &ScrollSnapshot,
        threshold: &VisibilityThreshold,
    ) -> Vec<ElementKey> {
        let mut newly = Vec::new();
        for probe in &snapshot.tops {
            let Some(revealed) = self.revealed.get_mut(&probe.key) else {
                continue;
            };
            if !*revealed && threshold.is_nearly_visible(probe.top, snapshot.viewport_height) {
                *revealed = true;
                newly.push(probe.key.clone());
            }
        }
        newly
    }

    #[must_use]
    pub fn is_revealed(&self, key: &ElementKey) -> bool {
        self.revealed.get(key).copied().unwrap_or(false)
    }

    /// Revealed keys in key order.
    pub fn revealed(&self) -> impl Iterator<Item = &ElementKey> {
        self.revealed
            .iter()
            .filter_map(|(key, revealed)| revealed.then_some(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> RevealSet {
        let mut set = RevealSet::new();
        for key in keys {
            set.track(ElementKey::from(*key));
        }
        set
    }

    #[test]
    fn reveals_once_and_never_unreveals() {
        let mut reveals = set(&["a", "b"]);
        let t = VisibilityThreshold::default();

        let snap = ScrollSnapshot::new(600.0)
            .with_top("a", 100.0)
            .with_top("b", 900.0);
        assert_eq!(reveals.observe(&snap, &t), vec![ElementKey::from("a")]);

        // a scrolls back out of view, b comes in.
        let snap = ScrollSnapshot::new(600.0)
            .with_top("a", 2000.0)
            .with_top("b", 10.0);
        assert_eq!(reveals.observe(&snap, &t), vec![ElementKey::from("b")]);
        assert!(reveals.is_revealed(&"a".into()));

        assert!(reveals.observe(&snap, &t).is_empty(), "idempotent");
        assert_eq!(reveals.revealed().count(), 2);
    }

    #[test]
    fn untracked_measurements_are_ignored() {
        let mut reveals = set(&["a"]);
        let snap = ScrollSnapshot::new(600.0).with_top("zzz", 0.0);
        assert!(reveals.observe(&snap, &VisibilityThreshold::default()).is_empty());
        assert!(!reveals.is_revealed(&"zzz".into()));
    }

    #[test]
    fn retrack_keeps_latch_and_forget_drops_it() {
        let mut reveals = set(&["a"]);
        let snap = ScrollSnapshot::new(600.0).with_top("a", 0.0);
        reveals.observe(&snap, &VisibilityThreshold::default());
        reveals.track("a".into());
        assert!(reveals.is_revealed(&"a".into()));
        assert!(reveals.forget(&"a".into()));
        assert!(reveals.is_empty());
    }
}
