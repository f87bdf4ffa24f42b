#![forbid(unsafe_code)]

//! Core: catalog data, filtering, host input events, geometry, and animation
//! primitives.
//!
//! Nothing in this crate touches the page. Input arrives as [`input::InputEvent`]
//! values pushed by the host, and every type here is plain data that the
//! runtime and site crates project into markup.

pub mod animation;
pub mod catalog;
pub mod filter;
pub mod format;
pub mod geometry;
pub mod input;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
