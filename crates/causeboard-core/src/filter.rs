#![forbid(unsafe_code)]

//! Category + free-text filtering of causes.
//!
//! # Invariants
//!
//! 1. Soundness: every cause yielded by [`FilterState::apply`] satisfies
//!    [`FilterState::matches`].
//! 2. Completeness: no matching cause is skipped.
//! 3. Order: results keep catalog order.
//!
//! There is no debouncing anywhere in the pipeline. Each keystroke re-runs a
//! linear scan, which is fine for a handful of causes and is the known limit
//! for large collections.

use crate::catalog::Cause;

/// Sentinel selector value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Category restriction read from the selector control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelector {
    /// No restriction.
    #[default]
    All,
    /// Exact category tag equality.
    Only(String),
}

impl CategorySelector {
    /// Interpret a raw selector value. Only `"all"` is special.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(raw.to_owned())
        }
    }

    /// Whether a category tag passes this selector.
    #[must_use]
    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// The `(category, query)` pair owned by the filter controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    category: CategorySelector,
    query: String,
    /// Lowercased `query`, cached so a scan lowercases it once.
    needle: String,
}

impl FilterState {
    /// Build from raw control values.
    #[must_use]
    pub fn new(category: &str, query: &str) -> Self {
        Self {
            category: CategorySelector::parse(category),
            query: query.to_owned(),
            needle: query.to_lowercase(),
        }
    }

    /// Current category selector.
    #[must_use]
    pub fn category(&self) -> &CategorySelector {
        &self.category
    }

    /// Current search text, verbatim.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search text.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_owned();
        self.needle = query.to_lowercase();
    }

    /// Replace the category from a raw selector value.
    pub fn set_category(&mut self, raw: &str) {
        self.category = CategorySelector::parse(raw);
    }

    /// The filter predicate.
    #[must_use]
    pub fn matches(&self, cause: &Cause) -> bool {
        self.category.admits(&cause.category)
            && (self.needle.is_empty()
                || cause.title.to_lowercase().contains(&self.needle)
                || cause.short_description.to_lowercase().contains(&self.needle))
    }

    /// Matching causes in source order.
    pub fn apply<'a>(&'a self, causes: &'a [Cause]) -> impl Iterator<Item = &'a Cause> + 'a {
        causes.iter().filter(move |c| self.matches(c))
    }
}
