#![forbid(unsafe_code)]

//! The causeboard page.
//!
//! [`app::SiteModel`] implements the runtime's `Model` for a nonprofit
//! landing page: a filterable cause listing with a detail modal, an events
//! strip, simulated volunteer/donate forms with toasts and a floating-heart
//! flourish, rolling counters and scroll reveals.
//!
//! Hosts talk to it through [`bridge::SiteEngine`], which speaks JSON in both
//! directions. On `wasm32` the same engine is exported to JS as
//! `CauseboardSite`; native builds (tests, tools) use the engine directly.

pub mod animator;
pub mod app;
pub mod bridge;
pub mod config;
pub mod detail;
pub mod flourish;
pub mod forms;
pub mod listing;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::CauseboardSite;

pub use app::{Msg, SiteModel};
pub use bridge::{BridgeError, Frame, HostEvent, SiteEngine};
pub use config::{ConfigError, SiteConfig};
