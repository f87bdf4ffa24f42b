#![forbid(unsafe_code)]

//! Canonical host input events.
//!
//! The host page owns every control and element; it translates DOM
//! notifications into [`InputEvent`] values and pushes them into the runtime.
//! All events derive `Clone` and `PartialEq` for use in tests.
//!
//! # Design Notes
//!
//! - Elements the core tracks across events (counters, reveal targets, the
//!   preloader) are identified by an [`ElementKey`] chosen by the host.
//! - Scroll snapshots carry measurements rather than asking the core to
//!   measure, so the core never touches layout.
//! - Form submissions arrive after the host has already suppressed default
//!   navigation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-chosen identifier of a page element (usually its `id` attribute).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementKey(String);

impl ElementKey {
    /// Wrap a key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Which page form was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Volunteer,
    Donate,
}

impl FormKind {
    /// The form's element id in the host page.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Volunteer => "volunteerForm",
            Self::Donate => "donateForm",
        }
    }

    /// Parse the lowercase kind name used by the JS bridge.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "volunteer" => Some(Self::Volunteer),
            "donate" => Some(Self::Donate),
            _ => None,
        }
    }
}

/// A counter element found on the page at mount time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterMount {
    pub key: ElementKey,
    /// Raw `data-target` attribute value, if present.
    #[serde(default)]
    pub target: Option<String>,
}

/// Elements the scroll animator should track.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMount {
    #[serde(default)]
    pub counters: Vec<CounterMount>,
    #[serde(default)]
    pub reveals: Vec<ElementKey>,
}

/// Top edge of one tracked element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementTop {
    pub key: ElementKey,
    pub top: f64,
}

/// Measurements taken on load and on every scroll.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    pub viewport_height: f64,
    #[serde(default)]
    pub tops: Vec<ElementTop>,
}

impl ScrollSnapshot {
    /// Create a snapshot for the given viewport height.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            tops: Vec::new(),
        }
    }

    /// Builder: add one measurement.
    #[must_use]
    pub fn with_top(mut self, key: impl Into<ElementKey>, top: f64) -> Self {
        self.tops.push(ElementTop {
            key: key.into(),
            top,
        });
        self
    }
}

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The search box value changed.
    Search(String),
    /// The category selector value changed.
    Category(String),
    /// A click landed on (or inside) a cause card.
    ///
    /// Carries the card's `data-id` attribute; `None` when the nearest card
    /// has no id.
    CardClick(Option<String>),
    /// A form was submitted (default navigation already suppressed).
    Submit(FormKind),
    /// The page finished loading; these elements are now tracked.
    Mount(PageMount),
    /// Fresh element measurements.
    Scroll(ScrollSnapshot),
    /// A tracked element was removed from the page.
    Unmount(ElementKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_kind_round_trips_bridge_names() {
        assert_eq!(FormKind::parse("donate"), Some(FormKind::Donate));
        assert_eq!(FormKind::parse("volunteer"), Some(FormKind::Volunteer));
        assert_eq!(FormKind::parse("Donate"), None);
        assert_eq!(FormKind::Donate.element_id(), "donateForm");
    }

    #[test]
    fn scroll_snapshot_decodes_from_host_json() {
        let json = r#"{"viewport_height": 800, "tops": [{"key": "stat-1", "top": 120.5}]}"#;
        let snap: ScrollSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap, ScrollSnapshot::new(800.0).with_top("stat-1", 120.5));
    }

    #[test]
    fn page_mount_defaults_missing_lists() {
        let mount: PageMount =
            serde_json::from_str(r#"{"counters": [{"key": "c"}]}"#).unwrap();
        assert_eq!(mount.counters[0].target, None);
        assert!(mount.reveals.is_empty());
    }
}
