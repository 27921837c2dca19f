//! Document fragment
//!
//! Lightweight container for detached root nodes. A view compiles its
//! template into a fragment and keeps it there until mount time.

use crate::{DomResult, DomTree, NodeId};

/// An ordered set of detached root nodes
#[derive(Debug, Clone, Default)]
pub struct DocumentFragment {
    children: Vec<NodeId>,
}

impl DocumentFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root node
    pub fn append(&mut self, node: NodeId) {
        self.children.push(node);
    }

    /// Root nodes, in order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Attach every root under `parent`, in order. The fragment keeps its
    /// node list, so the owner can detach and remount later.
    pub fn mount(&self, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        for &child in &self.children {
            tree.append_child(parent, child)?;
        }
        Ok(())
    }
}
