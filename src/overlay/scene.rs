//! Live, mutable copy of a frame document.
//!
//! The scene is imported from its own parse of the frame text and only keeps what renders: SVG
//! elements (plus `xlink:`/`xml:` attributes) and text. Nodes live in an arena; removed nodes are
//! detached and emptied.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::foundation::error::FrameResult;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Handle to a node of a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
enum NodeKind {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed SVG element tree that can be edited and serialized back to SVG text.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<NodeData>,
    root: NodeId,
    by_source: HashMap<usize, NodeId>,
}

impl Scene {
    /// Parse frame text into a new scene.
    pub fn parse(text: &str) -> FrameResult<Self> {
        let doc = crate::frame::parse_document(text)?;
        let mut scene = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            by_source: HashMap::new(),
        };
        scene.root = scene.import(doc.root_element(), None);
        Ok(scene)
    }

    fn import(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let attrs = node
            .attributes()
            .filter_map(|a| {
                let name = match a.namespace() {
                    None => a.name().to_string(),
                    Some(XLINK_NS) => format!("xlink:{}", a.name()),
                    Some(XML_NS) => format!("xml:{}", a.name()),
                    Some(_) => return None,
                };
                Some((name, a.value().to_string()))
            })
            .collect();

        let id = self.push(NodeKind::Element {
            name: node.tag_name().name().to_string(),
            attrs,
        });
        self.nodes[id.0].parent = parent;
        self.by_source.insert(node.range().start, id);

        for child in node.children() {
            if child.is_element() {
                if !matches!(child.tag_name().namespace(), None | Some(SVG_NS)) {
                    continue;
                }
                let c = self.import(child, Some(id));
                self.nodes[id.0].children.push(c);
            } else if let Some(text) = child.text().filter(|_| child.is_text()) {
                let c = self.push(NodeKind::Text(text.to_string()));
                self.nodes[c.0].parent = Some(id);
                self.nodes[id.0].children.push(c);
            }
        }
        id
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// The root `<svg>` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Element imported from the source byte offset `offset` (see `roxmltree::Node::range`).
    pub fn node_from_source(&self, offset: usize) -> Option<NodeId> {
        self.by_source.get(&offset).copied()
    }

    /// Element local name, or `None` for text nodes.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    /// Attribute value by (possibly `xlink:`-prefixed) name.
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Set or replace an attribute. No-op on text nodes.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            let value = value.into();
            match attrs.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value,
                None => attrs.push((key.to_string(), value)),
            }
        }
    }

    /// Parent of `id`, `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// `id` and all its descendants, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }

    /// First attached element (pre-order from the root) whose `key` attribute equals `value`.
    pub fn find_by_attr(&self, key: &str, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attr(*n, key) == Some(value))
    }

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str, attrs: &[(&str, String)]) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        })
    }

    /// Append `child` as the last child of `parent`, detaching it first if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.nodes[parent.0].children.len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among `parent`'s children, detaching it first if needed.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Move `id` to the end of its parent's children (topmost in paint order).
    pub fn raise(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.append_child(parent, id);
        }
    }

    /// Detach `id` and drop its subtree's content.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
        let removed = self.descendants(id);
        for n in &removed {
            let data = &mut self.nodes[n.0];
            data.kind = NodeKind::Text(String::new());
            data.children.clear();
            data.parent = None;
        }
        self.by_source.retain(|_, v| !removed.contains(v));
    }

    /// Return `true` when `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Value of `prop` in the inline `style` attribute.
    pub fn style_property(&self, id: NodeId, prop: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .find(|(k, _)| k.trim() == prop)
            .map(|(_, v)| v.trim().to_string())
    }

    /// Set `prop` in the inline `style` attribute, replacing any previous declaration of it.
    pub fn set_style_property(&mut self, id: NodeId, prop: &str, value: &str) {
        let mut decls: Vec<String> = self
            .attr(id, "style")
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .filter(|d| d.split_once(':').map(|(k, _)| k.trim()) != Some(prop))
            .map(str::to_string)
            .collect();
        decls.push(format!("{prop}:{value}"));
        self.set_attr(id, "style", decls.join(";"));
    }

    /// Effective declared value of a presentation property: inline style first, then attribute.
    pub fn presentation(&self, id: NodeId, prop: &str) -> Option<String> {
        self.style_property(id, prop)
            .or_else(|| self.attr(id, prop).map(|v| v.trim().to_string()))
    }

    /// Serialize the attached tree to SVG text.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, true, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, is_root: bool, out: &mut String) {
        let data = &self.nodes[id.0];
        match &data.kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Element { name, attrs } => {
                let _ = write!(out, "<{name}");
                if is_root {
                    let _ = write!(out, " xmlns=\"{SVG_NS}\" xmlns:xlink=\"{XLINK_NS}\"");
                }
                for (k, v) in attrs {
                    let _ = write!(out, " {k}=\"{}\"", escape(v, true));
                }
                if data.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &data.children {
                    self.write_node(*child, false, out);
                }
                let _ = write!(out, "</{name}>");
            }
        }
    }
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/scene.rs"]
mod tests;
