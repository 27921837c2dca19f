//! Spineless DOM - Element tree
//!
//! Arena-backed element tree. The runtime is headless, so this crate stands
//! in for the live DOM: views compile their templates into it and mount the
//! result under a parent element.

mod fragment;
mod node;
mod tree;

pub use fragment::DocumentFragment;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::DomTree;

/// Node identifier (index into the tree arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Document root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Check that this ID refers to a node at all
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Result type for tree operations
pub type DomResult<T> = Result<T, DomError>;

/// Tree operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,

    #[error("node is not an element")]
    NotAnElement,

    #[error("node is not a child of the given parent")]
    NotAChild,

    #[error("hierarchy request error (node would become its own ancestor)")]
    HierarchyRequest,
}
