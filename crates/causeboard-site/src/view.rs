#![forbid(unsafe_code)]

//! Pure projections from page data to fragments.
//!
//! Nothing here reads or keeps state: the same inputs always produce the
//! same nodes. Class names match the page stylesheet.

use std::time::Duration;

use causeboard_core::catalog::{Cause, Event};
use causeboard_render::{Element, Node};

use crate::forms::Toast;

/// Glyph used by the donation flourish.
pub const HEART_GLYPH: &str = "💝";

/// A selectable cause card inside its grid column.
#[must_use]
pub fn cause_card(cause: &Cause, delay: Duration) -> Node {
    Element::new("div")
        .class("col-md-4 mb-4")
        .child(
            Element::new("div")
                .class("cause-card animate-pop")
                .attr("role", "button")
                .attr("data-id", cause.id.to_string())
                .attr("aria-label", cause.title.as_str())
                .style(format!("animation-delay: {}ms", delay.as_millis()))
                .child(
                    Element::new("img")
                        .attr("src", cause.image_url.as_str())
                        .attr("alt", cause.title.as_str()),
                )
                .child(Element::new("h5").text(cause.title.as_str()))
                .child(Element::new("p").text(cause.short_description.as_str())),
        )
        .into()
}

/// A read-only event card.
#[must_use]
pub fn event_card(event: &Event) -> Node {
    Element::new("div")
        .class("col-md-4 mb-4")
        .child(
            Element::new("div")
                .class("cause-card animate-fade")
                .child(Element::new("h5").text(event.title.as_str()))
                .child(
                    Element::new("p")
                        .child(Element::new("strong").text("Date:"))
                        .text(format!(" {}", event.date)),
                )
                .child(Element::new("p").text(event.details.as_str())),
        )
        .into()
}

/// Modal title content.
#[must_use]
pub fn modal_title(cause: &Cause) -> Vec<Node> {
    vec![Node::text(cause.title.as_str())]
}

/// Modal body: image, rich details, and the two presentational buttons.
///
/// The buttons carry no behavior of their own.
#[must_use]
pub fn modal_body(cause: &Cause) -> Vec<Node> {
    vec![
        Element::new("img")
            .attr("src", cause.image_url.as_str())
            .attr("alt", cause.title.as_str())
            .class("img-fluid rounded mb-3")
            .into(),
        Node::raw(cause.details_markup.as_str()),
        Element::new("div")
            .class("mt-3")
            .child(
                Element::new("button")
                    .attr("type", "button")
                    .class("btn btn-donate me-2")
                    .attr("id", "modalDonateBtn")
                    .text("💝 Donate"),
            )
            .child(
                Element::new("button")
                    .attr("type", "button")
                    .class("btn btn-donate")
                    .attr("id", "modalVolunteerBtn")
                    .text("🤝 Volunteer"),
            )
            .into(),
    ]
}

/// A non-blocking acknowledgment.
#[must_use]
pub fn toast(toast: &Toast) -> Node {
    Element::new("div")
        .class("toast-note animate-fade")
        .attr("role", "status")
        .attr("data-toast", toast.id().to_string())
        .text(toast.message())
        .into()
}

/// One floating heart with its current inline style.
#[must_use]
pub fn heart(style: String) -> Node {
    Element::new("div")
        .class("floating-heart")
        .attr("aria-hidden", "true")
        .style(style)
        .text(HEART_GLYPH)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeboard_core::catalog::Catalog;
    use causeboard_render::markup::{nodes_to_markup, to_markup};
    use pretty_assertions::assert_eq;

    #[test]
    fn cause_card_markup() {
        let catalog = Catalog::builtin();
        let cause = &catalog.causes()[1];
        let html = to_markup(&cause_card(cause, Duration::from_millis(160)));
        assert_eq!(
            html,
            "<div class=\"col-md-4 mb-4\"><div class=\"cause-card animate-pop\" role=\"button\" \
             data-id=\"2\" aria-label=\"❤️ Healthcare Access\" style=\"animation-delay: 160ms\">\
             <img src=\"https://picsum.photos/seed/health/600/400\" alt=\"❤️ Healthcare Access\">\
             <h5>❤️ Healthcare Access</h5>\
             <p>Mobile health camps &amp; maternal care in rural areas.</p></div></div>"
        );
    }

    #[test]
    fn event_card_has_date_line() {
        let catalog = Catalog::builtin();
        let node = event_card(&catalog.events()[0]);
        assert!(to_markup(&node).contains("<p><strong>Date:</strong> December 15, 2025</p>"));
        assert_eq!(node.find_attr("data-id"), None);
    }

    #[test]
    fn modal_body_passes_details_through() {
        let catalog = Catalog::builtin();
        let cause = &catalog.causes()[0];
        let html = nodes_to_markup(&modal_body(cause));
        assert!(html.starts_with("<img src=\"https://picsum.photos/seed/edu/600/400\""));
        assert!(html.contains("class=\"img-fluid rounded mb-3\""));
        assert!(html.contains(&cause.details_markup));
        assert!(html.ends_with(
            "<div class=\"mt-3\"><button type=\"button\" class=\"btn btn-donate me-2\" id=\"modalDonateBtn\">💝 Donate</button>\
             <button type=\"button\" class=\"btn btn-donate\" id=\"modalVolunteerBtn\">🤝 Volunteer</button></div>"
        ));
    }

    #[test]
    fn titles_are_escaped() {
        let mut cause = Catalog::builtin().causes()[0].clone();
        cause.title = "<b>x</b>".to_owned();
        assert_eq!(nodes_to_markup(&modal_title(&cause)), "&lt;b&gt;x&lt;/b&gt;");
    }
}
