#![forbid(unsafe_code)]

//! Rolling number counters.
//!
//! A [`RollingCounter`] climbs from zero to a fixed target in equal steps once
//! its element first becomes nearly visible.
//!
//! # State machine
//!
//! ```text
//! Idle --start()--> Running{value} --tick()*--> Done
//!   \__ target <= 0 ______________________________/
//! ```
//!
//! # Invariants
//!
//! 1. Displayed values never decrease.
//! 2. The final value is exactly the target.
//! 3. `Done` is terminal; `start()` after the first call is a no-op.
//!
//! # Failure Modes
//!
//! - Missing or non-numeric `data-target`: treated as 0.
//! - Zero or negative target: settles immediately without ticking.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::counter_text;

/// Timing knobs for the fill animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterTiming {
    /// Nominal total duration of the fill.
    pub duration_ms: u64,
    /// Nominal tick length used to derive the step count.
    pub tick_ms: u64,
    pub min_steps: u32,
    pub max_steps: u32,
    /// Floor on the interval between ticks.
    pub min_interval_ms: u64,
}

impl Default for CounterTiming {
    fn default() -> Self {
        Self {
            duration_ms: 1100,
            tick_ms: 20,
            min_steps: 20,
            max_steps: 60,
            min_interval_ms: 8,
        }
    }
}

/// Step count, step size, and tick interval for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterPlan {
    pub steps: u32,
    pub increment: i64,
    pub interval: Duration,
}

impl CounterPlan {
    /// Derive the plan for `target`.
    ///
    /// `steps = min(max_steps, max(min_steps, duration / tick))`,
    /// `increment = max(1, ceil(target / steps))`,
    /// `interval = max(min_interval, duration / steps)`.
    #[must_use]
    pub fn new(target: i64, timing: &CounterTiming) -> Self {
        let nominal = timing
            .duration_ms
            .checked_div(timing.tick_ms)
            .unwrap_or(u64::MAX);
        let steps = nominal
            .max(u64::from(timing.min_steps))
            .min(u64::from(timing.max_steps))
            .max(1);
        // steps <= u32::MAX because it is bounded by max_steps.
        let steps = u32::try_from(steps).unwrap_or(u32::MAX);
        let increment = if target > 0 {
            let steps = i64::from(steps);
            target / steps + i64::from(target % steps != 0)
        } else {
            0
        }
        .max(1);
        let interval_ms = (timing.duration_ms / u64::from(steps)).max(timing.min_interval_ms);
        Self {
            steps,
            increment,
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// Where a counter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    /// Not yet seen.
    Idle,
    /// Climbing; `value` is what is currently displayed.
    Running { value: i64 },
    /// Settled on the target for good.
    Done,
}

/// Interpret a `data-target` attribute.
///
/// Missing, blank, non-numeric or non-finite values are 0. Fractions
/// truncate toward zero.
#[must_use]
pub fn parse_target(attr: Option<&str>) -> i64 {
    let Some(raw) = attr.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    match raw.parse::<f64>() {
        // `as` saturates at the i64 bounds.
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

/// One counter element's animation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingCounter {
    target: i64,
    plan: CounterPlan,
    phase: CounterPhase,
}

impl RollingCounter {
    /// Create an idle counter for `target`.
    #[must_use]
    pub fn new(target: i64, timing: &CounterTiming) -> Self {
        Self {
            target,
            plan: CounterPlan::new(target, timing),
            phase: CounterPhase::Idle,
        }
    }

    /// Create an idle counter from a raw `data-target` attribute.
    #[must_use]
    pub fn from_attr(attr: Option<&str>, timing: &CounterTiming) -> Self {
        Self::new(parse_target(attr), timing)
    }

    #[must_use]
    pub fn target(&self) -> i64 {
        self.target
    }

    #[must_use]
    pub fn plan(&self) -> &CounterPlan {
        &self.plan
    }

    #[must_use]
    pub fn phase(&self) -> CounterPhase {
        self.phase
    }

    /// Whether ticks are still wanted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, CounterPhase::Running { .. })
    }

    /// Leave `Idle`. Returns `true` only on the first call.
    pub fn start(&mut self) -> bool {
        if self.phase != CounterPhase::Idle {
            return false;
        }
        self.phase = if self.target <= 0 {
            CounterPhase::Done
        } else {
            CounterPhase::Running { value: 0 }
        };
        crate::debug!(
            target_value = self.target,
            steps = self.plan.steps,
            increment = self.plan.increment,
            "counter started"
        );
        true
    }

    /// Advance one step. Returns `true` if the displayed value changed.
    pub fn tick(&mut self) -> bool {
        let CounterPhase::Running { value } = self.phase else {
            return false;
        };
        let next = value.saturating_add(self.plan.increment);
        self.phase = if next >= self.target {
            crate::trace!(target_value = self.target, "counter settled");
            CounterPhase::Done
        } else {
            CounterPhase::Running { value: next }
        };
        true
    }

    /// Currently displayed value; `None` while idle.
    #[must_use]
    pub fn value(&self) -> Option<i64> {
        match self.phase {
            CounterPhase::Idle => None,
            CounterPhase::Running { value } => Some(value),
            CounterPhase::Done => Some(self.target),
        }
    }

    /// Display text for the current value; `None` while idle.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        self.value().map(|v| counter_text(v, self.target))
    }
}
