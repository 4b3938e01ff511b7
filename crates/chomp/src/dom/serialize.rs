// ABOUTME: Edit plan (skip / unwrap / src rewrite by NodeId) and the HTML serializer that applies it.
// ABOUTME: Nodes are never mutated in the parsed tree; edits take effect only in serialized output.

use std::collections::{HashMap, HashSet};

use ego_tree::{NodeId, NodeRef};
use scraper::Node;

/// Edits recorded against a parsed tree.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    skip: HashSet<NodeId>,
    unwrap: HashSet<NodeId>,
    src: HashMap<NodeId, String>,
}

impl EditPlan {
    /// Drop the node and its subtree.
    pub fn skip(&mut self, id: NodeId) {
        self.skip.insert(id);
    }

    /// Replace the node with its children.
    pub fn unwrap(&mut self, id: NodeId) {
        self.unwrap.insert(id);
    }

    /// Write a new `src` value on the node.
    pub fn rewrite_src(&mut self, id: NodeId, src: impl Into<String>) {
        self.src.insert(id, src.into());
    }

    pub fn is_skipped(&self, id: NodeId) -> bool {
        self.skip.contains(&id)
    }

    pub fn is_unwrapped(&self, id: NodeId) -> bool {
        self.unwrap.contains(&id)
    }

    pub fn src_for(&self, id: NodeId) -> Option<&str> {
        self.src.get(&id).map(String::as_str)
    }
}

/// Serialize a node (outer HTML) with the plan applied.
pub fn serialize_node(node: NodeRef<'_, Node>, plan: &EditPlan) -> String {
    let mut out = String::new();
    write_node(node, plan, &mut out);
    out
}

/// Serialize only the children of a node with the plan applied.
pub fn serialize_children(node: NodeRef<'_, Node>, plan: &EditPlan) -> String {
    let mut out = String::new();
    for child in node.children() {
        write_node(child, plan, &mut out);
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, plan: &EditPlan, out: &mut String) {
    if plan.is_skipped(node.id()) {
        return;
    }
    match node.value() {
        Node::Text(t) => out.push_str(&escape_text(t)),
        Node::Element(el) => {
            if plan.is_unwrapped(node.id()) {
                for child in node.children() {
                    write_node(child, plan, out);
                }
                return;
            }

            let name = el.name();
            out.push('<');
            out.push_str(name);
            for (k, v) in el.attrs() {
                let value = match plan.src_for(node.id()) {
                    Some(src) if k == "src" => src,
                    _ => v,
                };
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }

            if is_void_element(name) {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in node.children() {
                write_node(child, plan, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        _ => {}
    }
}

/// Escape attribute value
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Check if tag is void element
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
