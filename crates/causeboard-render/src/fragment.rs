#![forbid(unsafe_code)]

//! View fragments.
//!
//! A [`Node`] is a small immutable tree describing page content. Views build
//! fragments with the [`Element`] builder; nothing here knows about the page
//! or keeps hidden state.
//!
//! ```
//! use causeboard_render::fragment::{Element, Node};
//!
//! let card: Node = Element::new("div")
//!     .class("cause-card")
//!     .attr("data-id", "3")
//!     .child(Element::new("h5").text("Clean Water"))
//!     .into();
//! assert_eq!(card.find_attr("data-id"), Some("3"));
//! assert_eq!(card.text_content(), "Clean Water");
//! ```

/// A fragment of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Plain text; escaped when serialized.
    Text(String),
    /// Pre-formatted markup inserted verbatim.
    Raw(String),
}

impl Node {
    /// Plain text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Verbatim markup node.
    #[must_use]
    pub fn raw(markup: impl Into<String>) -> Self {
        Self::Raw(markup.into())
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated text of every `Text` node in document order.
    ///
    /// `Raw` content is opaque and skipped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Raw(_) => {}
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// First value of attribute `name` in a depth-first walk.
    #[must_use]
    pub fn find_attr(&self, name: &str) -> Option<&str> {
        let el = self.as_element()?;
        el.get_attr(name)
            .or_else(|| el.children.iter().find_map(|child| child.find_attr(name)))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// An element with attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Start an element with the given tag name.
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value with the same name.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Set the inline `style` attribute.
    #[must_use]
    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    /// Append one child.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    /// Append a verbatim markup child.
    #[must_use]
    pub fn raw(self, markup: impl Into<String>) -> Self {
        self.child(Node::raw(markup))
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[must_use]
    pub fn attrs(&self) -> &[(&'static str, String)] {
        &self.attrs
    }

    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }
}
