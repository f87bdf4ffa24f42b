#![forbid(unsafe_code)]

//! Runtime for causeboard page models.
//!
//! A [`program::Model`] owns page state, turns host input into messages,
//! and writes its view into a [`causeboard_render::Document`]. Side effects
//! are returned as [`program::Cmd`] values; recurring and delayed work is
//! declared as [`subscription::Subscription`]s and driven by a virtual
//! clock, so everything runs single-threaded and replays deterministically.
//!
//! The [`backend`] traits describe what a host must provide: a monotonic
//! clock, an input queue, and a presenter for patches and logs.

pub mod backend;
pub mod program;
pub mod subscription;

pub use backend::{Backend, BackendClock, BackendEventSource, BackendPresenter};
pub use program::{Cmd, Model};
pub use subscription::{
    After, Due, Every, Schedule, SubId, Subscription, SubscriptionManager, keyed_id,
};
