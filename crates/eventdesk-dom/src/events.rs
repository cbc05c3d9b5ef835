//! DOM Events
//!
//! Event objects, listener bookkeeping and subscription handles. Dispatch
//! itself lives on [`Document`](crate::Document) because listeners need
//! to re-enter the document while they run.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{NodeId, WeakDocument};

/// DOM event types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseEnter,
    MouseLeave,
    DOMContentLoaded,
    /// Application-defined event such as `dropdown:open`
    Custom(String),
}

impl EventType {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Event name as used by `addEventListener`
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::DOMContentLoaded => "DOMContentLoaded",
            Self::Custom(name) => name,
        }
    }

    /// Whether user-agent events of this type bubble
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::MouseEnter | Self::MouseLeave)
    }

    /// Whether user-agent events of this type can be canceled
    pub fn cancelable(&self) -> bool {
        matches!(self, Self::Click)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    /// Node whose listeners are currently running
    pub current_target: NodeId,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create a user-agent style event for `event_type`
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        let bubbles = event_type.bubbles();
        let cancelable = event_type.cancelable();
        Self {
            event_type,
            target,
            current_target: target,
            bubbles,
            cancelable,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Create a `CustomEvent`, never cancelable
    pub fn custom(name: impl Into<String>, target: NodeId, bubbles: bool) -> Self {
        Self {
            bubbles,
            cancelable: false,
            ..Self::new(EventType::custom(name), target)
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation after the current node's listeners
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining listeners on this node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut Event)>;

/// Listener identifier, unique within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Listeners by (target, type), in registration order
#[derive(Default)]
pub(crate) struct ListenerTable {
    next_id: u64,
    by_target: HashMap<(NodeId, EventType), Vec<(ListenerId, Listener)>>,
    index: HashMap<ListenerId, (NodeId, EventType)>,
}

impl ListenerTable {
    pub(crate) fn insert(&mut self, node: NodeId, event_type: EventType, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_target
            .entry((node, event_type.clone()))
            .or_default()
            .push((id, listener));
        self.index.insert(id, (node, event_type));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(key) = self.index.remove(&id) else {
            return false;
        };
        if let Some(list) = self.by_target.get_mut(&key) {
            list.retain(|(l, _)| *l != id);
            if list.is_empty() {
                self.by_target.remove(&key);
            }
        }
        true
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Clone the listeners of one node so they can run without a borrow
    pub(crate) fn snapshot(&self, node: NodeId, event_type: &EventType) -> Vec<(ListenerId, Listener)> {
        self.by_target
            .get(&(node, event_type.clone()))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node: NodeId, event_type: &EventType) -> usize {
        self.by_target
            .get(&(node, event_type.clone()))
            .map_or(0, Vec::len)
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

/// Handle to one registered listener
///
/// Dropping a subscription leaves the listener attached, like a closure
/// handed to `addEventListener`; call [`Subscription::unsubscribe`] to
/// remove it.
#[derive(Debug)]
#[must_use = "dropping a Subscription keeps the listener attached without a way to remove it"]
pub struct Subscription {
    doc: WeakDocument,
    id: ListenerId,
}

impl Subscription {
    pub(crate) fn new(doc: WeakDocument, id: ListenerId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.doc
            .upgrade()
            .is_some_and(|doc| doc.has_event_listener(self.id))
    }

    /// Remove the listener, returns false if it was already gone
    pub fn unsubscribe(self) -> bool {
        self.doc
            .upgrade()
            .is_some_and(|doc| doc.remove_event_listener(self.id))
    }
}
