#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Time-based animations advance by explicit `dt` values handed in by the
//! runtime, so they are fully deterministic under a host-driven clock.
//!
//! - [`Fade`]: normalized 0.0–1.0 progress over a duration (floating heart).
//! - [`stagger_offsets`]: cascading entrance delays for card lists.
//! - [`counter::RollingCounter`]: the Idle → Running → Done number fill.
//! - [`reveal::RevealSet`]: one-way "revealed" latches.

pub mod counter;
pub mod reveal;

use std::time::Duration;

pub use counter::{CounterPhase, CounterPlan, CounterTiming, RollingCounter};
pub use reveal::RevealSet;

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Linear progression from 0.0 to 1.0 over a duration.
///
/// Tracks elapsed time as [`Duration`] internally so repeated small ticks do
/// not drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
}

impl Fade {
    /// Create a fade with the given duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Stagger
// ---------------------------------------------------------------------------

/// Entrance delays for `count` list items spaced `delay` apart.
///
/// `offsets[i] == i * delay`; the first item always starts at zero.
#[must_use]
pub fn stagger_offsets(count: usize, delay: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| delay.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}
