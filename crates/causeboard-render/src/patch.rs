#![forbid(unsafe_code)]

//! Page patches: the only way rendered output reaches the host.
//!
//! A frame produces an ordered batch of [`DomPatch`] values. Batches serialize
//! to JSON for the JS bridge and hash deterministically for replay checks.

use causeboard_core::input::{ElementKey, FormKind};
use serde::Serialize;

use crate::document::RegionId;

const PATCH_HASH_ALGO: &str = "fnv1a64";
const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

/// One-shot host actions that are not content changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEffect {
    /// Open the cause detail modal.
    ShowModal,
    /// Clear every field of a form back to its initial state.
    ResetForm { form: FormKind },
}

/// One page mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomPatch {
    /// Replace all children of a region.
    ReplaceRegion { region: RegionId, html: String },
    /// Set an element's text content.
    SetText { element: ElementKey, text: String },
    AddClass { element: ElementKey, class: String },
    RemoveClass { element: ElementKey, class: String },
    /// Replace an element's inline style.
    SetStyle { element: ElementKey, style: String },
    Effect { effect: HostEffect },
}

/// Aggregate accounting for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchStats {
    pub patch_count: u32,
    /// Bytes of region markup carried by the batch.
    pub markup_bytes: u64,
}

/// Count patches and region markup bytes.
#[must_use]
pub fn patch_batch_stats(patches: &[DomPatch]) -> PatchStats {
    let markup_bytes = patches
        .iter()
        .map(|p| match p {
            DomPatch::ReplaceRegion { html, .. } => html.len() as u64,
            _ => 0,
        })
        .sum();
    PatchStats {
        patch_count: u32::try_from(patches.len()).unwrap_or(u32::MAX),
        markup_bytes,
    }
}

#[must_use]
fn fnv1a64_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

fn hash_str(hash: u64, s: &str) -> u64 {
    let len = u64::try_from(s.len()).unwrap_or(u64::MAX);
    fnv1a64_extend(fnv1a64_extend(hash, &len.to_le_bytes()), s.as_bytes())
}

/// Deterministic hash of a batch, in patch order.
#[must_use]
pub fn patch_batch_hash(patches: &[DomPatch]) -> String {
    let mut hash = FNV64_OFFSET_BASIS;
    let count = u64::try_from(patches.len()).unwrap_or(u64::MAX);
    hash = fnv1a64_extend(hash, &count.to_le_bytes());

    for patch in patches {
        hash = match patch {
            DomPatch::ReplaceRegion { region, html } => {
                hash_str(hash_str(fnv1a64_extend(hash, &[1]), region.element_id()), html)
            }
            DomPatch::SetText { element, text } => {
                hash_str(hash_str(fnv1a64_extend(hash, &[2]), element.as_str()), text)
            }
            DomPatch::AddClass { element, class } => {
                hash_str(hash_str(fnv1a64_extend(hash, &[3]), element.as_str()), class)
            }
            DomPatch::RemoveClass { element, class } => {
                hash_str(hash_str(fnv1a64_extend(hash, &[4]), element.as_str()), class)
            }
            DomPatch::SetStyle { element, style } => {
                hash_str(hash_str(fnv1a64_extend(hash, &[5]), element.as_str()), style)
            }
            DomPatch::Effect { effect } => match effect {
                HostEffect::ShowModal => fnv1a64_extend(hash, &[6, 0]),
                HostEffect::ResetForm { form } => {
                    hash_str(fnv1a64_extend(hash, &[6, 1]), form.element_id())
                }
            },
        };
    }

    format!("{PATCH_HASH_ALGO}:{hash:016x}")
}
