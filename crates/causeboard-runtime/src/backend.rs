#![forbid(unsafe_code)]

//! Host backend seams.
//!
//! A program runner never reads the wall clock, polls the page, or writes
//! to it directly. It goes through these traits, which a browser host
//! implements with a JS bridge and tests implement with in-memory queues.

use core::time::Duration;

use causeboard_core::input::InputEvent;
use causeboard_render::DomPatch;

/// Monotonic time source.
pub trait BackendClock {
    /// Time since program start.
    fn now_mono(&self) -> Duration;
}

/// Source of host input events.
pub trait BackendEventSource {
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Next pending event, if any. Never blocks.
    fn read_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}

/// Sink for rendered output.
pub trait BackendPresenter {
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Surface one log line to the host.
    fn write_log(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Hand over one frame's ordered patch batch.
    fn present_patches(
        &mut self,
        patches: Vec<DomPatch>,
        full_repaint: bool,
    ) -> Result<(), Self::Error>;
}

/// A complete backend: clock, events, and presenter sharing one error type.
pub trait Backend {
    type Error: core::fmt::Debug + core::fmt::Display;
    type Clock: BackendClock;
    type Events: BackendEventSource<Error = Self::Error>;
    type Presenter: BackendPresenter<Error = Self::Error>;

    fn clock(&self) -> &Self::Clock;
    fn events(&mut self) -> &mut Self::Events;
    fn presenter(&mut self) -> &mut Self::Presenter;
}
