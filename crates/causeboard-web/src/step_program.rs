#![forbid(unsafe_code)]

//! Step-based program runner for the browser.
//!
//! [`StepProgram`] drives a [`causeboard_runtime::program::Model`] through
//! init / event / update / view / present cycles without threads or blocking.
//! The host (JavaScript) controls the event loop:
//!
//! 1. Push events via [`StepProgram::push_event`].
//! 2. Advance time via [`StepProgram::advance_time`].
//! 3. Call [`StepProgram::step`] to process pending events, fire due timers,
//!    and render.
//! 4. Read the patch batch via [`StepProgram::take_outputs`].
//!
//! # Example
//!
//! ```ignore
//! use causeboard_web::step_program::StepProgram;
//! use causeboard_core::input::InputEvent;
//! use core::time::Duration;
//!
//! let mut prog = StepProgram::new(MyModel::default());
//! prog.init()?;
//!
//! prog.push_event(InputEvent::Search("water".into()));
//! prog.advance_time(Duration::from_millis(16));
//! let result = prog.step()?;
//!
//! if result.rendered {
//!     let outputs = prog.take_outputs();
//!     // Apply outputs.last_patches to the page...
//! }
//! ```

use core::time::Duration;

use causeboard_core::input::InputEvent;
use causeboard_render::{Document, DocumentDiff, DomPatch, HostEffect};
use causeboard_runtime::backend::{Backend, BackendClock, BackendEventSource, BackendPresenter};
use causeboard_runtime::program::{Cmd, Model};
use causeboard_runtime::subscription::SubscriptionManager;

use crate::{HostBackend, HostError, HostOutputs};

/// Upper bound on timer firings delivered by one `step()`.
///
/// A clock jump longer than this many timer periods leaves the remainder
/// due for the next step.
pub const MAX_TIMER_FIRINGS_PER_STEP: u32 = 4096;

/// Result of a single [`StepProgram::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether a frame was presented during this step.
    pub rendered: bool,
    /// Number of host events processed during this step.
    pub events_processed: u32,
    /// Number of timer firings delivered during this step.
    pub timers_fired: u32,
    /// Current frame index (monotonically increasing).
    pub frame_idx: u64,
}

/// Host-driven, non-blocking program runner.
///
/// # Lifecycle
///
/// 1. [`StepProgram::new`]: create with a model.
/// 2. [`StepProgram::init`]: call once to initialize the model and present
///    the first frame as a full repaint.
/// 3. [`StepProgram::step`]: call repeatedly from the host event loop.
/// 4. Read outputs after each step via [`StepProgram::take_outputs`].
pub struct StepProgram<M: Model> {
    model: M,
    backend: HostBackend,
    subscriptions: SubscriptionManager<M::Message>,
    pending_effects: Vec<HostEffect>,
    initialized: bool,
    dirty: bool,
    frame_idx: u64,
    prev_doc: Option<Document>,
}

impl<M: Model> StepProgram<M> {
    /// Create a new step program around `model`.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self::with_backend(model, HostBackend::new())
    }

    /// Create a step program with an existing [`HostBackend`].
    #[must_use]
    pub fn with_backend(model: M, backend: HostBackend) -> Self {
        Self {
            model,
            backend,
            subscriptions: SubscriptionManager::new(),
            pending_effects: Vec::new(),
            initialized: false,
            dirty: true,
            frame_idx: 0,
            prev_doc: None,
        }
    }

    /// Initialize the model and render the first frame.
    ///
    /// Must be called exactly once before [`step`](Self::step).
    pub fn init(&mut self) -> Result<(), HostError> {
        if self.initialized {
            return Err(HostError::AlreadyInitialized);
        }
        self.initialized = true;
        let now = self.now();
        let cmd = self.model.init();
        self.execute_cmd(cmd)?;
        self.reconcile(now);
        self.render_frame()
    }

    /// Process pending events, deliver due timers, and render if dirty.
    ///
    /// Events are handled first, in arrival order, at the current clock
    /// time. Timers due at or before the current time are then delivered
    /// one at a time, earliest first, reconciling subscriptions after each.
    pub fn step(&mut self) -> Result<StepResult, HostError> {
        if !self.initialized {
            return Err(HostError::NotInitialized);
        }
        let now = self.now();

        // 1. Process all pending events.
        let mut events_processed: u32 = 0;
        while let Some(event) = self.backend.events().read_event()? {
            events_processed += 1;
            self.handle_message(M::Message::from(event), now)?;
        }

        // 2. Deliver due timers in virtual-time order.
        let mut timers_fired: u32 = 0;
        while timers_fired < MAX_TIMER_FIRINGS_PER_STEP {
            let Some(due) = self.subscriptions.pop_due(now) else {
                break;
            };
            timers_fired += 1;
            self.handle_message(due.message, due.at)?;
        }

        // 3. Render if dirty.
        let rendered = if self.dirty {
            self.render_frame()?;
            true
        } else {
            false
        };

        Ok(StepResult {
            rendered,
            events_processed,
            timers_fired,
            frame_idx: self.frame_idx,
        })
    }

    /// Push a host input event into the queue.
    ///
    /// Events are processed on the next [`step`](Self::step) call.
    pub fn push_event(&mut self, event: InputEvent) {
        self.backend.events().push_event(event);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.backend.clock_mut().advance(dt);
    }

    /// Set the deterministic clock to an absolute time.
    pub fn set_time(&mut self, now: Duration) {
        self.backend.clock_mut().set(now);
    }

    /// Take the captured outputs (patch batch, logs), leaving empty defaults.
    pub fn take_outputs(&mut self) -> HostOutputs {
        self.backend.presenter().take_outputs()
    }

    /// Earliest time a timer is due, so the host can schedule a wakeup.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Duration> {
        self.subscriptions.next_due()
    }

    /// Number of running subscriptions.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active_count()
    }

    /// Access the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutably access the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Access the document presented last.
    pub fn document(&self) -> Option<&Document> {
        self.prev_doc.as_ref()
    }

    /// Whether the program has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current frame index.
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Current clock time.
    pub fn now(&self) -> Duration {
        self.backend.clock().now_mono()
    }

    // --- Private helpers ---

    fn handle_message(&mut self, msg: M::Message, at: Duration) -> Result<(), HostError> {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd)?;
        self.reconcile(at);
        Ok(())
    }

    fn reconcile(&mut self, at: Duration) {
        let subs = self.model.subscriptions();
        self.subscriptions.reconcile(subs, at);
    }

    fn render_frame(&mut self) -> Result<(), HostError> {
        let mut doc = Document::new();
        self.model.view(&mut doc);

        let full_repaint = self.prev_doc.is_none();
        let mut patches = DocumentDiff::compute(self.prev_doc.as_ref(), &doc).into_patches();
        patches.extend(
            self.pending_effects
                .drain(..)
                .map(|effect| DomPatch::Effect { effect }),
        );

        tracing::trace!(
            frame_idx = self.frame_idx,
            patches = patches.len(),
            full_repaint,
            "frame presented"
        );

        self.prev_doc = Some(doc);
        self.backend
            .presenter()
            .present_patches(patches, full_repaint)?;

        self.dirty = false;
        self.frame_idx += 1;
        Ok(())
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) -> Result<(), HostError> {
        match cmd {
            Cmd::None => {}
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.execute_cmd(cmd)?;
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c)?;
                }
            }
            Cmd::Log(text) => {
                self.backend.presenter().write_log(&text)?;
            }
            Cmd::Effect(effect) => {
                self.pending_effects.push(effect);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeboard_core::input::FormKind;
    use causeboard_render::{Node, RegionId};
    use causeboard_runtime::subscription::{After, Every, Subscription};
    use pretty_assertions::assert_eq;

    // ---- Test model ----

    #[derive(Default)]
    struct Ticker {
        query: String,
        ticks: u32,
        limit: u32,
        initialized: bool,
        notice: bool,
    }

    #[derive(Debug)]
    enum TickerMsg {
        Query(String),
        Start(u32),
        Tick,
        Notice,
        NoticeDone,
        Submit,
        Ignore,
    }

    impl From<InputEvent> for TickerMsg {
        fn from(event: InputEvent) -> Self {
            match event {
                InputEvent::Search(q) => TickerMsg::Query(q),
                InputEvent::Category(n) => TickerMsg::Start(n.parse().unwrap_or(0)),
                InputEvent::Submit(_) => TickerMsg::Submit,
                InputEvent::CardClick(_) => TickerMsg::Notice,
                _ => TickerMsg::Ignore,
            }
        }
    }

    impl Model for Ticker {
        type Message = TickerMsg;

        fn init(&mut self) -> Cmd<Self::Message> {
            self.initialized = true;
            Cmd::log("ready")
        }

        fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
            match msg {
                TickerMsg::Query(q) => {
                    self.query = q;
                    Cmd::none()
                }
                TickerMsg::Start(limit) => {
                    self.limit = limit;
                    self.ticks = 0;
                    Cmd::none()
                }
                TickerMsg::Tick => {
                    self.ticks += 1;
                    Cmd::none()
                }
                TickerMsg::Notice => {
                    self.notice = true;
                    Cmd::none()
                }
                TickerMsg::NoticeDone => {
                    self.notice = false;
                    Cmd::none()
                }
                TickerMsg::Submit => Cmd::batch(vec![
                    Cmd::log("submitted"),
                    Cmd::effect(HostEffect::ResetForm {
                        form: FormKind::Volunteer,
                    }),
                ]),
                TickerMsg::Ignore => Cmd::none(),
            }
        }

        fn view(&self, doc: &mut Document) {
            doc.set_region(RegionId::CauseList, [Node::text(self.query.clone())]);
            doc.set_text("ticks".into(), self.ticks.to_string());
        }

        fn subscriptions(&self) -> Vec<Box<dyn Subscription<TickerMsg>>> {
            let mut subs: Vec<Box<dyn Subscription<TickerMsg>>> = Vec::new();
            if self.ticks < self.limit {
                subs.push(Box::new(Every::with_id(
                    1,
                    Duration::from_millis(20),
                    || TickerMsg::Tick,
                )));
            }
            if self.notice {
                subs.push(Box::new(After::with_id(
                    2,
                    Duration::from_millis(100),
                    || TickerMsg::NoticeDone,
                )));
            }
            subs
        }
    }

    fn ready() -> StepProgram<Ticker> {
        let mut prog = StepProgram::new(Ticker::default());
        prog.init().unwrap();
        prog
    }

    #[test]
    fn init_presents_full_first_frame() {
        let mut prog = StepProgram::new(Ticker::default());
        assert!(!prog.is_initialized());
        prog.init().unwrap();
        assert!(prog.model().initialized);
        assert_eq!(prog.frame_idx(), 1);

        let out = prog.take_outputs();
        assert_eq!(out.logs, vec!["ready"]);
        assert!(out.last_full_repaint_hint);
        assert_eq!(out.last_patches.len(), 2);
    }

    #[test]
    fn init_twice_is_an_error() {
        let mut prog = ready();
        assert_eq!(prog.init(), Err(HostError::AlreadyInitialized));
    }

    #[test]
    fn step_before_init_is_an_error() {
        let mut prog = StepProgram::new(Ticker::default());
        assert_eq!(prog.step(), Err(HostError::NotInitialized));
    }

    #[test]
    fn idle_step_renders_nothing() {
        let mut prog = ready();
        prog.take_outputs();
        let result = prog.step().unwrap();
        assert!(!result.rendered);
        assert_eq!(result.events_processed, 0);
        assert_eq!(result.frame_idx, 1);
    }

    #[test]
    fn events_render_incremental_diff() {
        let mut prog = ready();
        prog.take_outputs();
        prog.push_event(InputEvent::Search("camp".into()));
        let result = prog.step().unwrap();
        assert!(result.rendered);
        assert_eq!(result.events_processed, 1);

        let out = prog.take_outputs();
        assert!(!out.last_full_repaint_hint);
        assert_eq!(
            out.last_patches,
            vec![DomPatch::ReplaceRegion {
                region: RegionId::CauseList,
                html: "camp".into()
            }]
        );
    }

    #[test]
    fn effects_follow_diff_patches_once() {
        let mut prog = ready();
        prog.take_outputs();
        prog.push_event(InputEvent::Submit(FormKind::Volunteer));
        prog.step().unwrap();
        let out = prog.take_outputs();
        assert_eq!(out.logs, vec!["submitted"]);
        assert_eq!(
            out.last_patches,
            vec![DomPatch::Effect {
                effect: HostEffect::ResetForm {
                    form: FormKind::Volunteer
                }
            }]
        );

        prog.push_event(InputEvent::CardClick(None));
        prog.step().unwrap();
        assert!(prog.take_outputs().last_patches.is_empty());
    }

    #[test]
    fn clock_jump_catches_up_and_stops_at_limit() {
        let mut prog = ready();
        prog.push_event(InputEvent::Category("5".into()));
        prog.step().unwrap();
        assert_eq!(prog.active_subscriptions(), 1);
        assert_eq!(prog.next_wakeup(), Some(Duration::from_millis(20)));

        prog.advance_time(Duration::from_secs(1));
        let result = prog.step().unwrap();
        assert_eq!(result.timers_fired, 5);
        assert_eq!(prog.model().ticks, 5);
        assert_eq!(prog.active_subscriptions(), 0);
        assert_eq!(
            prog.document().and_then(|d| d.text(&"ticks".into())),
            Some("5")
        );
    }

    #[test]
    fn timers_fire_only_when_due() {
        let mut prog = ready();
        prog.push_event(InputEvent::Category("3".into()));
        prog.step().unwrap();

        prog.advance_time(Duration::from_millis(19));
        assert_eq!(prog.step().unwrap().timers_fired, 0);
        prog.advance_time(Duration::from_millis(1));
        assert_eq!(prog.step().unwrap().timers_fired, 1);
    }

    #[test]
    fn one_shot_expires_after_delay() {
        let mut prog = ready();
        prog.set_time(Duration::from_millis(50));
        prog.push_event(InputEvent::CardClick(None));
        prog.step().unwrap();
        assert!(prog.model().notice);

        prog.set_time(Duration::from_millis(149));
        prog.step().unwrap();
        assert!(prog.model().notice);

        prog.set_time(Duration::from_millis(150));
        let result = prog.step().unwrap();
        assert_eq!(result.timers_fired, 1);
        assert!(!prog.model().notice);
        assert_eq!(prog.active_subscriptions(), 0);
    }
}
