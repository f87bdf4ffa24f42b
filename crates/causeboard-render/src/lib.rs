#![forbid(unsafe_code)]

//! Render: from view fragments to page patches.
//!
//! # Pipeline
//!
//! 1. A model's `view` builds [`fragment::Node`] trees (pure, no side effects)
//!    and writes them into a [`document::Document`] by region.
//! 2. [`markup`] serializes fragments, escaping text and attribute values.
//! 3. [`diff::DocumentDiff`] compares the previous and next documents and
//!    yields [`patch::DomPatch`] values: whole-region replacements plus
//!    per-element text, class, and style updates.
//!
//! The host applies patches in order. Replacing a region's content is the
//! only stateful operation and it lives entirely on the host side.

pub mod diff;
pub mod document;
pub mod fragment;
pub mod markup;
pub mod patch;

pub use diff::DocumentDiff;
pub use document::{Document, RegionId};
pub use fragment::{Element, Node};
pub use patch::{DomPatch, HostEffect};
