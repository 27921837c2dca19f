//! Element tree (arena-based allocation)
//!
//! All nodes live in one `Vec`; identities are [`NodeId`] indices. Nodes are
//! never freed (a detached subtree simply has no parent), which keeps every
//! handed-out ID valid for the life of the tree.

use crate::{DomError, DomResult, Node, NodeData, NodeId};

/// Arena-based element tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Document root
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes in the tree (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Detaches the child from any previous parent first. Fails if either
    /// node does not exist or the move would make a node its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if child == parent || self.contains(child, parent) {
            tracing::warn!(?parent, ?child, "append_child would create a cycle");
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child);

        let old_last = self.nodes[parent.0 as usize].last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = old_last;
        }
        if old_last.is_valid() {
            self.nodes[old_last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
        Ok(())
    }

    /// Remove `child` from `parent`, leaving the child's subtree intact.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let node = self.get(child).ok_or(DomError::NotFound)?;
        if node.parent != parent {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink a node from its parent and siblings. The node's own subtree is
    /// untouched. No-op for unknown or already-detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate over the direct children of a node, in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Iterate over a node's ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE),
        }
    }

    /// Check whether `ancestor` contains `node` (strictly; a node does not
    /// contain itself)
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Get an attribute from an element node
    pub fn attr(&self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let node = self.get(id).ok_or(DomError::NotFound)?;
        let el = node.as_element().ok_or(DomError::NotAnElement)?;
        Ok(el.get_attr(name).map(str::to_string))
    }

    /// Set an attribute on an element node
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound)?;
        let el = node.as_element_mut().ok_or(DomError::NotAnElement)?;
        el.set_attr(name, value);
        Ok(())
    }

    /// Remove an attribute from an element node
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let node = self.get_mut(id).ok_or(DomError::NotFound)?;
        let el = node.as_element_mut().ok_or(DomError::NotAnElement)?;
        Ok(el.remove_attr(name))
    }

    /// Replace an element's content with a single text node.
    ///
    /// This is rendered-text assignment: the value is stored verbatim, never
    /// interpreted as markup.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let node = self.get(id).ok_or(DomError::NotFound)?;
        if !node.is_element() {
            return Err(DomError::NotAnElement);
        }

        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.detach(child);
        }
        let text_node = self.create_text(text);
        self.append_child(id, text_node)
    }

    /// Concatenated text of a node's subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        if let Some(text) = node.as_text() {
            out.push_str(text);
        }
        for child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Current value of a form control (the `value` attribute, or empty).
    ///
    /// Reads live state at call time, which is what form harvesting needs.
    pub fn value(&self, id: NodeId) -> String {
        self.attr(id, "value").ok().flatten().unwrap_or_default()
    }

    /// Set the value of a form control
    pub fn set_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.set_attr(id, "value", value)
    }

    /// Render a subtree as HTML-ish text. For logs and test assertions, not
    /// for browsers: attributes are emitted in set order, text verbatim.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Document => {
                for child in self.children(id) {
                    self.write_html(child, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&attr.value);
                    out.push('"');
                }
                out.push('>');
                for child in self.children(id) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.get(current).map(|n| n.next_sibling).unwrap_or(NodeId::NONE);
        Some(current)
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.get(current).map(|n| n.parent).unwrap_or(NodeId::NONE);
        Some(current)
    }
}
