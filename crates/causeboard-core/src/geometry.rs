#![forbid(unsafe_code)]

//! Viewport geometry for scroll-driven effects.
//!
//! Coordinates are CSS pixels relative to the top of the viewport, as
//! reported by `getBoundingClientRect()`.

use serde::{Deserialize, Serialize};

/// Default distance above the viewport bottom at which an element counts as
/// nearly visible.
pub const DEFAULT_REVEAL_MARGIN_PX: f64 = 80.0;

/// The "nearly visible" test shared by counters and reveals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityThreshold {
    /// Pixels subtracted from the viewport height.
    pub margin_px: f64,
}

impl Default for VisibilityThreshold {
    fn default() -> Self {
        Self {
            margin_px: DEFAULT_REVEAL_MARGIN_PX,
        }
    }
}

impl VisibilityThreshold {
    /// Create a threshold with the given margin.
    #[must_use]
    pub const fn new(margin_px: f64) -> Self {
        Self { margin_px }
    }

    /// `top < viewport_height - margin`.
    ///
    /// Non-finite measurements never count as visible.
    #[must_use]
    pub fn is_nearly_visible(&self, top: f64, viewport_height: f64) -> bool {
        top.is_finite() && viewport_height.is_finite() && top < viewport_height - self.margin_px
    }
}
