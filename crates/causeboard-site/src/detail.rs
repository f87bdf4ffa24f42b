#![forbid(unsafe_code)]

//! Cause detail viewer.
//!
//! A card click carries the card's raw `data-id`. A hit selects the cause
//! and asks the host to open the modal; a miss leaves the previous
//! selection and the modal untouched.

use causeboard_core::catalog::{Catalog, Cause, CauseId};

/// What a card click resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A cause was found and is now selected.
    Opened(CauseId),
    /// The click carried no id; nothing to do.
    NoId,
    /// The id did not parse or names no cause.
    Missing { raw: String },
}

/// Tracks which cause the modal currently shows.
#[derive(Debug, Clone, Default)]
pub struct DetailViewer {
    selected: Option<CauseId>,
}

impl DetailViewer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a click against `catalog`.
    pub fn select(&mut self, catalog: &Catalog, raw: Option<&str>) -> Selection {
        let Some(raw) = raw else {
            return Selection::NoId;
        };
        match CauseId::parse_attr(raw).filter(|id| catalog.find(*id).is_some()) {
            Some(id) => {
                self.selected = Some(id);
                Selection::Opened(id)
            }
            None => Selection::Missing {
                raw: raw.to_owned(),
            },
        }
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<CauseId> {
        self.selected
    }

    /// The selected cause, if any.
    #[must_use]
    pub fn selected<'a>(&self, catalog: &'a Catalog) -> Option<&'a Cause> {
        self.selected.and_then(|id| catalog.find(id))
    }
}
