//! Document - High-level document API
//!
//! `Document` is a shared handle over the tree and its listeners. Every
//! method borrows the inner state only for its own duration, and dispatch
//! never holds a borrow while a listener runs, so listeners may mutate the
//! document, dispatch nested events and add or remove listeners.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::events::ListenerTable;
use crate::{
    DOMStringMap, DomError, DomTree, ElementData, ElementQuery, Event, EventType, Listener,
    ListenerId, NodeId, Subscription,
};

struct DocumentInner {
    url: String,
    tree: RefCell<DomTree>,
    listeners: RefCell<ListenerTable>,
    html_element: Cell<NodeId>,
    head_element: Cell<NodeId>,
    body_element: Cell<NodeId>,
}

/// HTML Document
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

/// Non-owning document handle, held by subscriptions
#[derive(Debug, Clone)]
pub struct WeakDocument(Weak<DocumentInner>);

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.0.upgrade().map(|inner| Document { inner })
    }
}

impl Document {
    /// Create a document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let doc = Self::empty(url);
        {
            let mut tree = doc.tree_mut();
            let html = tree.create_element("html");
            let head = tree.create_element("head");
            let body = tree.create_element("body");
            let root = tree.root();
            for (parent, child) in [(root, html), (html, head), (html, body)] {
                if let Err(err) = tree.append_child(parent, child) {
                    tracing::error!("Failed to build document skeleton: {}", err);
                }
            }
        }
        doc.finalize();
        doc
    }

    /// Create a document holding only the document node
    pub fn empty(url: &str) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                url: url.to_string(),
                tree: RefCell::new(DomTree::new()),
                listeners: RefCell::new(ListenerTable::default()),
                html_element: Cell::new(NodeId::NONE),
                head_element: Cell::new(NodeId::NONE),
                body_element: Cell::new(NodeId::NONE),
            }),
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built
    pub fn finalize(&self) {
        let (html, head, body) = {
            let tree = self.tree();
            let find = |parent: NodeId, tag: &str| {
                tree.children(parent)
                    .find(|(_, n)| n.as_element().is_some_and(|e| e.tag == tag))
                    .map_or(NodeId::NONE, |(id, _)| id)
            };
            let html = find(tree.root(), "html");
            (html, find(html, "head"), find(html, "body"))
        };
        self.inner.html_element.set(html);
        self.inner.head_element.set(head);
        self.inner.body_element.set(body);
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument(Rc::downgrade(&self.inner))
    }

    /// Check whether two handles refer to the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.inner.html_element.get()
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.inner.head_element.get()
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.inner.body_element.get()
    }

    /// Borrow the DOM tree
    ///
    /// Do not hold the guard across calls that dispatch events.
    pub fn tree(&self) -> Ref<'_, DomTree> {
        self.inner.tree.borrow()
    }

    /// Borrow the DOM tree mutably
    pub fn tree_mut(&self) -> RefMut<'_, DomTree> {
        self.inner.tree.borrow_mut()
    }

    /// Get document title
    pub fn title(&self) -> String {
        let tree = self.tree();
        tree.children(self.head())
            .find(|(_, n)| n.as_element().is_some_and(|e| e.tag == "title"))
            .map(|(id, _)| tree.text_content(id))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree_mut().create_element(tag)
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.tree_mut().create_text(text)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree_mut().append_child(parent, child)
    }

    /// Detach a node (and its subtree) from its parent
    pub fn remove(&self, node: NodeId) -> bool {
        self.tree_mut().detach(node)
    }

    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree().contains(ancestor, node)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree().text_content(node)
    }

    // ------------------------------------------------------------------
    // Element state
    // ------------------------------------------------------------------

    /// Run `f` on an element's data, `None` if the node is not an element
    pub fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        self.tree().element(node).map(f)
    }

    /// Run `f` on an element's mutable data, `None` if not an element
    pub fn with_element_mut<R>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        self.tree_mut().element_mut(node).map(f)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.with_element(node, |e| e.tag.clone())
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_element(node, |e| e.attribute(name).map(|v| v.into_owned()))
            .flatten()
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.with_element(node, |e| e.has_attr(name)).unwrap_or(false)
    }

    /// Set an attribute, returns false if the node is not an element
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> bool {
        self.with_element_mut(node, |e| e.set_attr(name, value)).is_some()
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> bool {
        self.with_element_mut(node, |e| e.remove_attr(name))
            .unwrap_or(false)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element(node, |e| e.class_list.contains(class))
            .unwrap_or(false)
    }

    /// Add a class, returns true if the class list changed
    pub fn add_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element_mut(node, |e| e.class_list.add(class))
            .unwrap_or(false)
    }

    /// Remove a class, returns true if the class list changed
    pub fn remove_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element_mut(node, |e| e.class_list.remove(class))
            .unwrap_or(false)
    }

    pub fn style_value(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_element(node, |e| e.style.get_property_value(property).map(str::to_string))
            .flatten()
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&self, node: NodeId, property: &str, value: &str) -> bool {
        self.with_element_mut(node, |e| e.style.set_property(property, value))
            .is_some()
    }

    /// Drop every inline style declaration (`el.style = ''`)
    pub fn clear_style(&self, node: NodeId) -> bool {
        self.with_element_mut(node, |e| e.style.clear()).is_some()
    }

    pub fn dataset(&self, node: NodeId) -> DOMStringMap {
        self.with_element(node, ElementData::dataset)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree().get_element_by_id(id)
    }

    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.tree().query_selector(scope, selector)
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.tree().query_selector_all(scope, selector)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a listener on `node`
    pub fn add_event_listener(
        &self,
        node: NodeId,
        event_type: EventType,
        listener: impl Fn(&mut Event) + 'static,
    ) -> Subscription {
        let listener: Listener = Rc::new(listener);
        let id = self
            .inner
            .listeners
            .borrow_mut()
            .insert(node, event_type, listener);
        Subscription::new(self.downgrade(), id)
    }

    /// Remove a listener by ID, returns false if it was not registered
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(id)
    }

    pub fn has_event_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow().contains(id)
    }

    /// Listeners registered on `node` for `event_type`
    pub fn listener_count(&self, node: NodeId, event_type: &EventType) -> usize {
        self.inner.listeners.borrow().count(node, event_type)
    }

    /// Listeners registered anywhere in this document
    pub fn total_listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch an event at its target, bubbling to the document node when
    /// the event bubbles. Returns false if a listener prevented the default.
    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        let path: Vec<NodeId> = {
            let tree = self.tree();
            if event.bubbles {
                std::iter::once(event.target)
                    .chain(tree.ancestors(event.target))
                    .collect()
            } else {
                vec![event.target]
            }
        };
        tracing::trace!(
            "Dispatching {} at {:?} through {} node(s)",
            event.event_type,
            event.target,
            path.len()
        );

        for node in path {
            event.current_target = node;
            let listeners = self
                .inner
                .listeners
                .borrow()
                .snapshot(node, &event.event_type);

            for (id, listener) in listeners {
                // removed by an earlier listener of this same dispatch
                if !self.has_event_listener(id) {
                    continue;
                }
                listener(event);
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }

            if event.is_propagation_stopped() {
                break;
            }
        }

        !event.is_default_prevented()
    }

    /// Simulate a user click; disabled form controls receive nothing
    pub fn click(&self, node: NodeId) -> bool {
        if self.with_element(node, ElementData::is_disabled).unwrap_or(false) {
            tracing::trace!("Click on disabled control {:?} ignored", node);
            return false;
        }
        self.dispatch_event(&mut Event::new(EventType::Click, node))
    }

    /// Simulate the pointer entering `node`
    pub fn pointer_enter(&self, node: NodeId) {
        self.dispatch_event(&mut Event::new(EventType::MouseEnter, node));
    }

    /// Simulate the pointer leaving `node`
    pub fn pointer_leave(&self, node: NodeId) {
        self.dispatch_event(&mut Event::new(EventType::MouseLeave, node));
    }

    /// Fire `DOMContentLoaded` on the document node
    pub fn fire_content_loaded(&self) {
        tracing::debug!("DOMContentLoaded: {}", self.url());
        self.dispatch_event(&mut Event::new(EventType::DOMContentLoaded, self.root()));
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.inner.url)
            .field("nodes", &self.inner.tree.try_borrow().map(|t| t.len()).ok())
            .field("body", &self.body())
            .finish()
    }
}
