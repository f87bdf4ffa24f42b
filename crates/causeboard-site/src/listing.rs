#![forbid(unsafe_code)]

//! Cause listing: the filter controller and the list renderer.
//!
//! Search and category changes both land in the same [`FilterState`]; the
//! next frame re-renders the whole cause list from it. There is no
//! debouncing, so every keystroke costs one scan of the catalog plus one
//! serialization of the visible cards. Large catalogs would want a
//! debounce on the host side.

use std::time::Duration;

use causeboard_core::animation::stagger_offsets;
use causeboard_core::catalog::{Cause, Event};
use causeboard_core::filter::{ALL_CATEGORIES, FilterState};
use causeboard_render::Node;

use crate::view;

/// Owns the current `(category, query)` pair.
#[derive(Debug, Clone, Default)]
pub struct FilterController {
    state: FilterState,
    revision: u64,
}

impl FilterController {
    /// Start unfiltered: category `all`, empty query.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FilterState::new(ALL_CATEGORIES, ""),
            revision: 0,
        }
    }

    /// The search box changed.
    pub fn on_search(&mut self, text: &str) {
        tracing::trace!(query = text, "search changed");
        self.state.set_query(text);
        self.revision = self.revision.wrapping_add(1);
    }

    /// The category selector changed.
    pub fn on_category(&mut self, value: &str) {
        tracing::trace!(category = value, "category changed");
        self.state.set_category(value);
        self.revision = self.revision.wrapping_add(1);
    }

    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Count of handled filter changes. Each one must replace the list.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// One card per matching cause, in source order.
///
/// Card `i` of the output gets an entrance delay of `i * stagger`.
#[must_use]
pub fn render(causes: &[Cause], filter: &FilterState, stagger: Duration) -> Vec<Node> {
    let visible: Vec<&Cause> = filter.apply(causes).collect();
    let delays = stagger_offsets(visible.len(), stagger);
    visible
        .into_iter()
        .zip(delays)
        .map(|(cause, delay)| view::cause_card(cause, delay))
        .collect()
}

/// Every event, in source order.
#[must_use]
pub fn render_events(events: &[Event]) -> Vec<Node> {
    events.iter().map(view::event_card).collect()
}
