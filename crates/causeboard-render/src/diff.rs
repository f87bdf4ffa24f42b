#![forbid(unsafe_code)]

//! Diff computation between documents.
//!
//! `DocumentDiff` compares two frames and lists the patches that turn the
//! first into the second. Regions compare by serialized markup and epoch,
//! so an unchanged region costs a string compare and emits nothing, while a
//! bumped epoch forces a replacement of identical markup.
//!
//! # Ordering
//!
//! Patches are emitted region replacements first (in [`RegionId`] order),
//! then text, class, and style updates, each in element key order. Hosts
//! may apply them sequentially without further sorting.
//!
//! # Usage
//!
//! ```
//! use causeboard_render::document::{Document, RegionId};
//! use causeboard_render::diff::DocumentDiff;
//! use causeboard_render::fragment::Node;
//!
//! let old = Document::new();
//! let mut new = Document::new();
//! new.set_region(RegionId::EventList, [Node::text("none")]);
//!
//! let diff = DocumentDiff::compute(Some(&old), &new);
//! assert_eq!(diff.len(), 1);
//!
//! // A second identical frame changes nothing.
//! assert!(DocumentDiff::compute(Some(&new), &new).is_empty());
//! ```

use std::collections::BTreeSet;

use crate::document::{Document, RegionId};
use crate::patch::DomPatch;

/// Ordered patch list produced by comparing two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDiff {
    patches: Vec<DomPatch>,
}

impl DocumentDiff {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `old` against `new`.
    ///
    /// With no previous frame every written region and element is emitted.
    /// A region present in `old` but not written in `new` is cleared.
    /// Element keys that disappear are left as they are on the page.
    #[must_use]
    pub fn compute(old: Option<&Document>, new: &Document) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "document_diff",
            full = old.is_none(),
            regions = new.regions.len()
        )
        .entered();

        let empty = Document::default();
        let old = old.unwrap_or(&empty);
        let mut patches = Vec::new();

        for region in RegionId::ALL {
            match (old.regions.get(&region), new.regions.get(&region)) {
                (Some(before), Some(after))
                    if before == after
                        && old.region_epoch(region) == new.region_epoch(region) => {}
                (_, Some(after)) => patches.push(DomPatch::ReplaceRegion {
                    region,
                    html: after.clone(),
                }),
                (Some(_), None) => patches.push(DomPatch::ReplaceRegion {
                    region,
                    html: String::new(),
                }),
                (None, None) => {}
            }
        }

        for (element, text) in &new.texts {
            if old.texts.get(element) != Some(text) {
                patches.push(DomPatch::SetText {
                    element: element.clone(),
                    text: text.clone(),
                });
            }
        }

        let no_classes = BTreeSet::new();
        for (element, after) in &new.classes {
            let before = old.classes.get(element).unwrap_or(&no_classes);
            for class in after.difference(before) {
                patches.push(DomPatch::AddClass {
                    element: element.clone(),
                    class: class.clone(),
                });
            }
            for class in before.difference(after) {
                patches.push(DomPatch::RemoveClass {
                    element: element.clone(),
                    class: class.clone(),
                });
            }
        }

        for (element, style) in &new.styles {
            if old.styles.get(element) != Some(style) {
                patches.push(DomPatch::SetStyle {
                    element: element.clone(),
                    style: style.clone(),
                });
            }
        }

        Self { patches }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[must_use]
    pub fn patches(&self) -> &[DomPatch] {
        &self.patches
    }

    #[must_use]
    pub fn into_patches(self) -> Vec<DomPatch> {
        self.patches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Element, Node};
    use causeboard_core::input::ElementKey;
    use pretty_assertions::assert_eq;

    fn doc_with_list(text: &str) -> Document {
        let mut doc = Document::new();
        doc.set_region(RegionId::CauseList, [Element::new("p").text(text).into()]);
        doc.set_region(RegionId::EventList, [Node::text("events")]);
        doc
    }

    #[test]
    fn first_frame_emits_everything() {
        let mut doc = doc_with_list("a");
        doc.set_text("stat".into(), "0");
        let diff = DocumentDiff::compute(None, &doc);
        assert_eq!(
            diff.patches(),
            &[
                DomPatch::ReplaceRegion {
                    region: RegionId::CauseList,
                    html: "<p>a</p>".into()
                },
                DomPatch::ReplaceRegion {
                    region: RegionId::EventList,
                    html: "events".into()
                },
                DomPatch::SetText {
                    element: "stat".into(),
                    text: "0".into()
                },
            ]
        );
    }

    #[test]
    fn unchanged_regions_are_skipped() {
        let old = doc_with_list("a");
        let new = doc_with_list("b");
        let diff = DocumentDiff::compute(Some(&old), &new);
        assert_eq!(
            diff.into_patches(),
            vec![DomPatch::ReplaceRegion {
                region: RegionId::CauseList,
                html: "<p>b</p>".into()
            }]
        );
    }

    #[test]
    fn bumped_epoch_replaces_identical_markup() {
        let mut old = doc_with_list("a");
        old.set_region_epoch(RegionId::CauseList, 1);
        let mut new = doc_with_list("a");
        new.set_region_epoch(RegionId::CauseList, 2);
        assert_eq!(
            DocumentDiff::compute(Some(&old), &new).into_patches(),
            vec![DomPatch::ReplaceRegion {
                region: RegionId::CauseList,
                html: "<p>a</p>".into()
            }]
        );

        let mut same = doc_with_list("a");
        same.set_region_epoch(RegionId::CauseList, 2);
        assert!(DocumentDiff::compute(Some(&new), &same).is_empty());
    }

    #[test]
    fn dropped_region_is_cleared() {
        let mut old = doc_with_list("a");
        old.set_region(RegionId::Toasts, [Node::text("hi")]);
        let new = doc_with_list("a");
        let diff = DocumentDiff::compute(Some(&old), &new);
        assert_eq!(
            diff.patches(),
            &[DomPatch::ReplaceRegion {
                region: RegionId::Toasts,
                html: String::new()
            }]
        );
    }

    #[test]
    fn class_sets_diff_both_ways() {
        let key = ElementKey::from("card");
        let mut old = Document::new();
        old.add_class(key.clone(), "a");
        old.add_class(key.clone(), "b");
        let mut new = Document::new();
        new.add_class(key.clone(), "b");
        new.add_class(key.clone(), "c");
        let diff = DocumentDiff::compute(Some(&old), &new);
        assert_eq!(
            diff.patches(),
            &[
                DomPatch::AddClass {
                    element: key.clone(),
                    class: "c".into()
                },
                DomPatch::RemoveClass {
                    element: key,
                    class: "a".into()
                },
            ]
        );
    }

    #[test]
    fn vanished_element_keys_emit_nothing() {
        let mut old = Document::new();
        old.set_text("gone".into(), "1");
        old.add_class("gone".into(), "visible");
        old.set_style("gone".into(), "display:none");
        assert!(DocumentDiff::compute(Some(&old), &Document::new()).is_empty());
    }

    #[test]
    fn style_change_emits_once() {
        let mut old = Document::new();
        old.set_style("preloader".into(), "");
        let mut new = Document::new();
        new.set_style("preloader".into(), "display:none");
        let diff = DocumentDiff::compute(Some(&old), &new);
        assert_eq!(diff.len(), 1);
        assert!(DocumentDiff::compute(Some(&new), &new).is_empty());
    }
}
