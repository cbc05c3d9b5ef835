//! EventDesk DOM - Document Object Model
//!
//! Arena-backed element tree with class lists, inline styles, data
//! attributes and bubbling event dispatch. Single-threaded: a [`Document`]
//! is a cheap `Rc` handle and listeners run on the caller's thread.

mod classlist;
mod dataset;
mod document;
mod events;
mod node;
mod selector;
mod style;
mod tree;

pub use classlist::DOMTokenList;
pub use dataset::DOMStringMap;
pub use document::{Document, WeakDocument};
pub use events::{Event, EventType, Listener, ListenerId, Subscription};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{CompoundSelector, ElementQuery, SelectorList, SimpleSelector};
pub use style::CSSStyleDeclaration;
pub use tree::{Ancestors, Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this ID refers to a node slot
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
