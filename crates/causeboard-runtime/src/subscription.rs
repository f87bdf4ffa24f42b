#![forbid(unsafe_code)]

//! Subscription system for timers.
//!
//! Subscriptions provide a declarative way to receive timed messages. The
//! runtime manages subscription lifecycles automatically based on what the
//! model declares as active.
//!
//! # How it works
//!
//! 1. `Model::subscriptions()` returns the set of active subscriptions
//! 2. After each `update()`, the runtime compares active vs previous subscriptions
//! 3. New subscriptions are started at the current virtual time, removed ones
//!    are cancelled
//! 4. Due firings are popped one at a time, earliest first, and routed through
//!    `Model::update()`
//!
//! Time is whatever the host says it is. Nothing here sleeps or spawns; a
//! large clock jump is caught up by popping firings in time order, with a
//! reconcile between each, so a timer cancelled by one firing never fires
//! again afterwards.

use std::collections::HashSet;
use std::time::Duration;

/// A unique identifier for a subscription.
///
/// Used by the runtime to track which subscriptions are active and
/// to deduplicate subscriptions across update cycles.
pub type SubId = u64;

/// Shortest interval or delay a timer may use.
pub const MIN_TIMER_INTERVAL: Duration = Duration::from_millis(1);

/// When a subscription fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Repeatedly, every `interval` after start.
    Every(Duration),
    /// Once, `delay` after start.
    After(Duration),
}

impl Schedule {
    fn period(self) -> Duration {
        match self {
            Self::Every(d) | Self::After(d) => d.max(MIN_TIMER_INTERVAL),
        }
    }
}

/// A subscription produces messages on a schedule.
pub trait Subscription<M> {
    /// Unique identifier for deduplication.
    ///
    /// Subscriptions with the same ID are considered identical. The runtime
    /// uses this to avoid restarting unchanged subscriptions.
    fn id(&self) -> SubId;

    fn schedule(&self) -> Schedule;

    /// Build the message delivered on each firing.
    fn message(&self) -> M;
}

/// Stable id derived from a namespace and a key, for keyed timers.
#[must_use]
pub fn keyed_id(namespace: &str, key: &str) -> SubId {
    const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV64_PRIME: u64 = 0x100000001b3;
    let mut hash = FNV64_OFFSET_BASIS;
    for byte in namespace.bytes().chain([0]).chain(key.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

/// One firing popped from the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Due<M> {
    pub id: SubId,
    /// Virtual time the firing was scheduled for.
    pub at: Duration,
    pub message: M,
}

struct RunningSubscription<M> {
    id: SubId,
    sub: Box<dyn Subscription<M>>,
    period: Duration,
    repeating: bool,
    /// `None` once a one-shot has fired.
    next_due: Option<Duration>,
}

/// Tracks running timers against a virtual clock.
pub struct SubscriptionManager<M> {
    active: Vec<RunningSubscription<M>>,
}

impl<M> Default for SubscriptionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> SubscriptionManager<M> {
    #[must_use]
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Update the set of active subscriptions.
    ///
    /// Compares the new set against currently running subscriptions:
    /// - Starts subscriptions that are new (ID not in active set), first due
    ///   one period after `now`
    /// - Cancels subscriptions that are no longer declared
    /// - Leaves unchanged subscriptions running on their original schedule
    ///
    /// A one-shot that already fired stays inert while it is still declared,
    /// so redeclaring it does not fire it twice.
    pub fn reconcile(&mut self, subscriptions: Vec<Box<dyn Subscription<M>>>, now: Duration) {
        let new_ids: HashSet<SubId> = subscriptions.iter().map(|s| s.id()).collect();
        let active_count_before = self.active.len();

        tracing::trace!(
            new_id_count = new_ids.len(),
            active_before = active_count_before,
            "subscription reconcile starting"
        );

        self.active.retain(|running| {
            let keep = new_ids.contains(&running.id);
            if !keep {
                tracing::debug!(sub_id = running.id, "Stopping subscription");
            }
            keep
        });

        let mut active_ids: HashSet<SubId> = self.active.iter().map(|r| r.id).collect();
        for sub in subscriptions {
            let id = sub.id();
            if !active_ids.insert(id) {
                continue;
            }
            let schedule = sub.schedule();
            let period = schedule.period();
            tracing::debug!(sub_id = id, ?schedule, "Starting subscription");
            self.active.push(RunningSubscription {
                id,
                sub,
                period,
                repeating: matches!(schedule, Schedule::Every(_)),
                next_due: Some(now.saturating_add(period)),
            });
        }

        tracing::trace!(
            active_before = active_count_before,
            active_after = self.active.len(),
            "subscription reconcile complete"
        );
    }

    /// Pop the single earliest firing due at or before `now`.
    ///
    /// Ties go to the subscription started first. A repeating timer is
    /// rescheduled one period after its due time, not after `now`, so a
    /// clock jump yields every missed firing in order.
    pub fn pop_due(&mut self, now: Duration) -> Option<Due<M>> {
        let (idx, at) = self
            .active
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.next_due.map(|at| (i, at)))
            .filter(|&(_, at)| at <= now)
            .min_by_key(|&(i, at)| (at, i))?;

        let running = &mut self.active[idx];
        let period = running.period;
        running.next_due = running.repeating.then(|| at.saturating_add(period));
        tracing::trace!(sub_id = running.id, at_ms = at.as_millis() as u64, "subscription fired");
        Some(Due {
            id: running.id,
            at,
            message: running.sub.message(),
        })
    }

    /// Earliest pending firing time, if any timer is armed.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.active.iter().filter_map(|r| r.next_due).min()
    }

    /// Whether a subscription with `id` is running (armed or spent).
    #[must_use]
    pub fn is_active(&self, id: SubId) -> bool {
        self.active.iter().any(|r| r.id == id)
    }

    /// Return the number of active subscriptions.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Cancel all running subscriptions.
    pub fn stop_all(&mut self) {
        self.active.clear();
    }
}

// --- Built-in subscriptions ---

/// A subscription that fires at a fixed interval.
///
/// # Example
///
/// ```ignore
/// fn subscriptions(&self) -> Vec<Box<dyn Subscription<MyMsg>>> {
///     vec![Box::new(Every::with_id(1, Duration::from_millis(16), || MyMsg::Frame))]
/// }
/// ```
pub struct Every<M> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn() -> M>,
}

impl<M> Every<M> {
    /// Create a repeating timer with an explicit ID.
    pub fn with_id(id: SubId, interval: Duration, make_msg: impl Fn() -> M + 'static) -> Self {
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }
}

impl<M> Subscription<M> for Every<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn schedule(&self) -> Schedule {
        Schedule::Every(self.interval)
    }

    fn message(&self) -> M {
        (self.make_msg)()
    }
}

/// A subscription that fires once after a delay.
pub struct After<M> {
    id: SubId,
    delay: Duration,
    make_msg: Box<dyn Fn() -> M>,
}

impl<M> After<M> {
    pub fn with_id(id: SubId, delay: Duration, make_msg: impl Fn() -> M + 'static) -> Self {
        Self {
            id,
            delay,
            make_msg: Box::new(make_msg),
        }
    }
}

impl<M> Subscription<M> for After<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn schedule(&self) -> Schedule {
        Schedule::After(self.delay)
    }

    fn message(&self) -> M {
        (self.make_msg)()
    }
}
