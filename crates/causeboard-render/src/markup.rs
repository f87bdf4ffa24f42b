#![forbid(unsafe_code)]

//! HTML serialization of fragments.
//!
//! Text and attribute values are escaped; [`Node::Raw`] is emitted verbatim.
//! Output is deterministic: attributes keep insertion order and no
//! whitespace is added.

use crate::fragment::{Element, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Serialize one node.
#[must_use]
pub fn to_markup(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serialize a sequence of sibling nodes.
#[must_use]
pub fn nodes_to_markup(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, false, out),
        Node::Raw(markup) => out.push_str(markup),
        Node::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(el.tag());
    for (name, value) in el.attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&el.tag()) {
        return;
    }
    for child in el.child_nodes() {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(el.tag());
    out.push('>');
}

/// Escape `&`, `<`, `>` (and `"`, `'` inside attributes).
#[must_use]
pub fn escape(text: &str, in_attr: bool) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, in_attr, &mut out);
    out
}

fn escape_into(text: &str, in_attr: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            '\'' if in_attr => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
