#![forbid(unsafe_code)]

//! `causeboard-web` provides a browser-friendly backend for causeboard models.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes input events.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The crate does not bind to `wasm-bindgen` itself. The site crate wraps
//! [`step_program::StepProgram`] with its own JS surface.

pub mod step_program;

use core::time::Duration;
use std::collections::VecDeque;

use causeboard_core::input::InputEvent;
use causeboard_render::DomPatch;
use causeboard_render::patch::{PatchStats, patch_batch_hash, patch_batch_stats};
use causeboard_runtime::backend::{Backend, BackendClock, BackendEventSource, BackendPresenter};

/// Host backend error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// `init()` was called a second time.
    AlreadyInitialized,
    /// `step()` was called before `init()`.
    NotInitialized,
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyInitialized => f.write_str("program already initialized"),
            Self::NotInitialized => f.write_str("program not initialized"),
        }
    }
}

impl std::error::Error for HostError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl BackendClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Host-driven input queue.
#[derive(Debug, Clone, Default)]
pub struct HostEventSource {
    queue: VecDeque<InputEvent>,
}

impl HostEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event into the queue.
    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl BackendEventSource for HostEventSource {
    type Error = HostError;

    fn read_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}

/// Captured presentation outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct HostOutputs {
    /// Log lines written by the runtime.
    pub logs: Vec<String>,
    /// Last presented patch batch, in application order.
    pub last_patches: Vec<DomPatch>,
    /// Aggregate accounting for the last batch.
    pub last_patch_stats: Option<PatchStats>,
    /// Deterministic hash of the last batch.
    pub last_patch_hash: Option<String>,
    /// Whether the last present was a full repaint.
    pub last_full_repaint_hint: bool,
}

/// Presenter that captures patch batches and logs for the host.
#[derive(Debug, Clone, Default)]
pub struct HostPresenter {
    outputs: HostOutputs,
}

impl HostPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get captured outputs.
    #[must_use]
    pub const fn outputs(&self) -> &HostOutputs {
        &self.outputs
    }

    /// Take captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> HostOutputs {
        std::mem::take(&mut self.outputs)
    }
}

impl BackendPresenter for HostPresenter {
    type Error = HostError;

    fn write_log(&mut self, text: &str) -> Result<(), Self::Error> {
        self.outputs.logs.push(text.to_owned());
        Ok(())
    }

    fn present_patches(
        &mut self,
        patches: Vec<DomPatch>,
        full_repaint: bool,
    ) -> Result<(), Self::Error> {
        self.outputs.last_patch_stats = Some(patch_batch_stats(&patches));
        self.outputs.last_patch_hash = Some(patch_batch_hash(&patches));
        self.outputs.last_patches = patches;
        self.outputs.last_full_repaint_hint = full_repaint;
        Ok(())
    }
}

/// A minimal, host-driven backend.
///
/// - push events via [`Backend::events`]
/// - advance time via [`Self::clock_mut`]
/// - read patch batches via [`Backend::presenter`]
#[derive(Debug, Clone, Default)]
pub struct HostBackend {
    clock: DeterministicClock,
    events: HostEventSource,
    presenter: HostPresenter,
}

impl HostBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutably access the clock.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }
}

impl Backend for HostBackend {
    type Error = HostError;

    type Clock = DeterministicClock;
    type Events = HostEventSource;
    type Presenter = HostPresenter;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn events(&mut self) -> &mut Self::Events {
        &mut self.events
    }

    fn presenter(&mut self) -> &mut Self::Presenter {
        &mut self.presenter
    }
}
