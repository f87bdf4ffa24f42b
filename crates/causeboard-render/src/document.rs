#![forbid(unsafe_code)]

//! The per-frame document a model's view writes into.
//!
//! A [`Document`] is rebuilt from scratch every frame. Regions hold fully
//! serialized markup plus an optional epoch; tracked elements hold text,
//! classes, and inline styles. Nothing here touches the page: the diff against the previous
//! frame decides what the host must change.

use std::collections::{BTreeMap, BTreeSet};

use causeboard_core::input::ElementKey;
use serde::Serialize;

use crate::fragment::Node;
use crate::markup::nodes_to_markup;

/// Display regions owned by the host page, addressed by element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RegionId {
    #[serde(rename = "cause-list")]
    CauseList,
    #[serde(rename = "event-list")]
    EventList,
    #[serde(rename = "causeTitle")]
    ModalTitle,
    #[serde(rename = "causeDetails")]
    ModalBody,
    #[serde(rename = "toast-stack")]
    Toasts,
    /// Fixed-position layer for transient flourishes.
    #[serde(rename = "fx-layer")]
    Effects,
}

impl RegionId {
    /// Every region, in patch order.
    pub const ALL: [Self; 6] = [
        Self::CauseList,
        Self::EventList,
        Self::ModalTitle,
        Self::ModalBody,
        Self::Toasts,
        Self::Effects,
    ];

    /// The host element id of this region.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::CauseList => "cause-list",
            Self::EventList => "event-list",
            Self::ModalTitle => "causeTitle",
            Self::ModalBody => "causeDetails",
            Self::Toasts => "toast-stack",
            Self::Effects => "fx-layer",
        }
    }
}

/// Frame contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) regions: BTreeMap<RegionId, String>,
    pub(crate) epochs: BTreeMap<RegionId, u64>,
    pub(crate) texts: BTreeMap<ElementKey, String>,
    pub(crate) classes: BTreeMap<ElementKey, BTreeSet<String>>,
    pub(crate) styles: BTreeMap<ElementKey, String>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a region's full content, replacing anything written earlier
    /// this frame.
    pub fn set_region<I>(&mut self, region: RegionId, nodes: I)
    where
        I: IntoIterator<Item = Node>,
    {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        self.regions.insert(region, nodes_to_markup(&nodes));
    }

    /// Stamp a region with a content epoch.
    ///
    /// When the epoch differs from the previous frame's, the region is
    /// replaced even if its markup is byte-identical. Unstamped regions sit
    /// at epoch 0.
    pub fn set_region_epoch(&mut self, region: RegionId, epoch: u64) {
        self.epochs.insert(region, epoch);
    }

    #[must_use]
    pub fn region_epoch(&self, region: RegionId) -> u64 {
        self.epochs.get(&region).copied().unwrap_or(0)
    }

    /// Serialized markup of a region, if written.
    #[must_use]
    pub fn region(&self, region: RegionId) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    pub fn set_text(&mut self, element: ElementKey, text: impl Into<String>) {
        self.texts.insert(element, text.into());
    }

    #[must_use]
    pub fn text(&self, element: &ElementKey) -> Option<&str> {
        self.texts.get(element).map(String::as_str)
    }

    pub fn add_class(&mut self, element: ElementKey, class: impl Into<String>) {
        self.classes.entry(element).or_default().insert(class.into());
    }

    #[must_use]
    pub fn has_class(&self, element: &ElementKey, class: &str) -> bool {
        self.classes
            .get(element)
            .is_some_and(|set| set.contains(class))
    }

    pub fn set_style(&mut self, element: ElementKey, style: impl Into<String>) {
        self.styles.insert(element, style.into());
    }

    #[must_use]
    pub fn style(&self, element: &ElementKey) -> Option<&str> {
        self.styles.get(element).map(String::as_str)
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.texts.is_empty()
            && self.classes.is_empty()
            && self.styles.is_empty()
    }
}
