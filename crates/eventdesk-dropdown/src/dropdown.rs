//! Dropdown component
//!
//! A `Dropdown` is a cheap clonable handle. Its listeners keep their own
//! handle, so a wired dropdown stays alive as long as its document keeps
//! the listeners, exactly like an instance captured by DOM callbacks.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use eventdesk_dom::{Document, Event, EventType, NodeId, Subscription, WeakDocument};

use crate::{
    events, position, DropdownConfig, DropdownError, ExclusivityGroup, TriggerMode, ITEM_SELECTOR,
    MENU_SELECTOR, OPEN_CLASS, TRIGGER_SELECTOR,
};

/// Container given to a constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    Node(NodeId),
    /// Selector resolved against the whole document
    Selector(String),
}

impl From<NodeId> for ContainerRef {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

#[derive(Debug, Clone, Copy)]
struct Elements {
    container: NodeId,
    trigger: NodeId,
    menu: NodeId,
}

struct DropdownInner {
    doc: WeakDocument,
    /// `None` for an inert instance
    elements: Option<Elements>,
    error: Option<DropdownError>,
    config: DropdownConfig,
    group: ExclusivityGroup,
    is_open: Cell<bool>,
    destroyed: Cell<bool>,
    /// Trigger, hover and click-outside listeners
    subscriptions: RefCell<Vec<Subscription>>,
}

/// Dropdown menu bound to a container element
#[derive(Clone)]
pub struct Dropdown {
    inner: Rc<DropdownInner>,
}

/// Non-owning handle kept by exclusivity groups
#[derive(Clone)]
pub(crate) struct WeakDropdown(Weak<DropdownInner>);

impl WeakDropdown {
    pub(crate) fn upgrade(&self) -> Option<Dropdown> {
        self.0.upgrade().map(|inner| Dropdown { inner })
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub(crate) fn points_to(&self, dropdown: &Dropdown) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&dropdown.inner))
    }
}

impl Dropdown {
    /// Create a dropdown in the document's default exclusivity group
    ///
    /// A missing container, trigger or menu is logged and yields an inert
    /// instance on which every operation is a no-op.
    pub fn new(doc: &Document, target: impl Into<ContainerRef>, config: DropdownConfig) -> Self {
        Self::new_in(&ExclusivityGroup::for_document(doc), doc, target, config)
    }

    /// Like [`Dropdown::new`], in an explicit group
    pub fn new_in(
        group: &ExclusivityGroup,
        doc: &Document,
        target: impl Into<ContainerRef>,
        config: DropdownConfig,
    ) -> Self {
        match locate(doc, &target.into()) {
            Ok((elements, items)) => Self::install(group, doc, elements, items, config),
            Err(err) => {
                tracing::error!("Dropdown: {}", err);
                Self::from_parts(group, doc, None, Some(err), config)
            }
        }
    }

    /// Create a dropdown in the document's default group, failing on bad markup
    pub fn try_new(
        doc: &Document,
        target: impl Into<ContainerRef>,
        config: DropdownConfig,
    ) -> Result<Self, DropdownError> {
        Self::try_new_in(&ExclusivityGroup::for_document(doc), doc, target, config)
    }

    /// Like [`Dropdown::try_new`], in an explicit group
    pub fn try_new_in(
        group: &ExclusivityGroup,
        doc: &Document,
        target: impl Into<ContainerRef>,
        config: DropdownConfig,
    ) -> Result<Self, DropdownError> {
        let (elements, items) = locate(doc, &target.into())?;
        Ok(Self::install(group, doc, elements, items, config))
    }

    fn from_parts(
        group: &ExclusivityGroup,
        doc: &Document,
        elements: Option<Elements>,
        error: Option<DropdownError>,
        config: DropdownConfig,
    ) -> Self {
        Self {
            inner: Rc::new(DropdownInner {
                doc: doc.downgrade(),
                elements,
                error,
                config,
                group: group.clone(),
                is_open: Cell::new(false),
                destroyed: Cell::new(false),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    fn install(
        group: &ExclusivityGroup,
        doc: &Document,
        elements: Elements,
        items: Vec<NodeId>,
        config: DropdownConfig,
    ) -> Self {
        let dropdown = Self::from_parts(group, doc, Some(elements), None, config);
        let Elements { container, trigger, menu } = elements;

        position::apply(doc, container, menu, dropdown.inner.config.position);
        doc.set_style(menu, "display", "none");
        doc.remove_class(container, OPEN_CLASS);

        group.register(&dropdown);
        dropdown.wire(doc, elements, items);

        tracing::debug!(
            "Dropdown created on {:?} (trigger {:?}, menu {:?}, {} / {})",
            container,
            trigger,
            menu,
            dropdown.inner.config.position,
            dropdown.inner.config.trigger_mode
        );
        dropdown
    }

    fn wire(&self, doc: &Document, elements: Elements, items: Vec<NodeId>) {
        let config = &self.inner.config;
        let mut subscriptions = Vec::new();

        match config.trigger_mode {
            TriggerMode::Click => {
                let this = self.clone();
                subscriptions.push(doc.add_event_listener(
                    elements.trigger,
                    EventType::Click,
                    move |e| {
                        e.prevent_default();
                        e.stop_propagation();
                        this.toggle();
                    },
                ));
            }
            TriggerMode::Hover => {
                let this = self.clone();
                subscriptions.push(doc.add_event_listener(
                    elements.container,
                    EventType::MouseEnter,
                    move |_| this.open(),
                ));
                let this = self.clone();
                subscriptions.push(doc.add_event_listener(
                    elements.container,
                    EventType::MouseLeave,
                    move |_| this.close(),
                ));
            }
            TriggerMode::Manual => {}
        }

        if config.close_on_click_outside {
            let this = self.clone();
            subscriptions.push(doc.add_event_listener(doc.root(), EventType::Click, move |e| {
                this.handle_click_outside(e.target);
            }));
        }

        if config.close_on_select {
            // never removed, destroy() leaves them inert
            for item in items {
                let this = self.clone();
                let _ = doc.add_event_listener(item, EventType::Click, move |_| {
                    if this.inner.config.closes_on_item_click() {
                        this.close();
                    }
                });
            }
        }

        self.inner.subscriptions.borrow_mut().extend(subscriptions);
    }

    fn handle_click_outside(&self, target: NodeId) {
        let Some((doc, elements)) = self.live() else {
            return;
        };
        if self.is_open() && !doc.contains(elements.container, target) {
            tracing::trace!("Click outside {:?} closes it", elements.container);
            self.close();
        }
    }

    /// Document and elements, unless inert, destroyed or orphaned
    fn live(&self) -> Option<(Document, Elements)> {
        if self.inner.destroyed.get() {
            return None;
        }
        let elements = self.inner.elements?;
        let doc = self.inner.doc.upgrade()?;
        Some((doc, elements))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Show the menu and close the rest of the group
    pub fn open(&self) {
        let Some((doc, elements)) = self.live() else {
            return;
        };
        if self.inner.is_open.get() {
            return;
        }

        doc.set_style(elements.menu, "display", "block");
        doc.add_class(elements.container, OPEN_CLASS);
        self.inner.is_open.set(true);
        tracing::debug!("Dropdown {:?} opened", elements.container);

        self.inner.group.close_others(self);

        doc.dispatch_event(&mut Event::custom(events::OPENED, elements.container, true));
    }

    /// Hide the menu
    pub fn close(&self) {
        let Some((doc, elements)) = self.live() else {
            return;
        };
        if !self.inner.is_open.get() {
            return;
        }

        self.hide(&doc, elements);
        tracing::debug!("Dropdown {:?} closed", elements.container);

        doc.dispatch_event(&mut Event::custom(events::CLOSED, elements.container, true));
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Closed by another member of the group; no notification
    pub(crate) fn force_close(&self) {
        if let Some((doc, elements)) = self.live() {
            if self.inner.is_open.get() {
                self.hide(&doc, elements);
            }
        }
    }

    fn hide(&self, doc: &Document, elements: Elements) {
        doc.set_style(elements.menu, "display", "none");
        doc.remove_class(elements.container, OPEN_CLASS);
        self.inner.is_open.set(false);
    }

    /// Re-apply the configured placement, safe while open
    pub fn apply_position(&self) {
        if let Some((doc, elements)) = self.live() {
            position::apply(&doc, elements.container, elements.menu, self.inner.config.position);
        }
    }

    pub fn update_position(&self) {
        self.apply_position();
    }

    /// Remove listeners and layout styles; later operations are no-ops
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }

        let subscriptions = self.inner.subscriptions.take();
        let removed = subscriptions
            .into_iter()
            .map(Subscription::unsubscribe)
            .filter(|removed| *removed)
            .count();
        self.inner.group.deregister(self);

        if let (Some(elements), Some(doc)) = (self.inner.elements, self.inner.doc.upgrade()) {
            doc.set_style(elements.container, "position", "");
            doc.clear_style(elements.menu);
            doc.remove_class(elements.container, OPEN_CLASS);
            tracing::debug!(
                "Dropdown {:?} destroyed, {} listener(s) removed",
                elements.container,
                removed
            );
        }
        self.inner.is_open.set(false);
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.inner.is_open.get()
    }

    /// False when construction failed
    pub fn is_enabled(&self) -> bool {
        self.inner.elements.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Why construction failed, for an inert instance
    pub fn error(&self) -> Option<&DropdownError> {
        self.inner.error.as_ref()
    }

    pub fn container(&self) -> Option<NodeId> {
        self.inner.elements.map(|e| e.container)
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.inner.elements.map(|e| e.trigger)
    }

    pub fn menu(&self) -> Option<NodeId> {
        self.inner.elements.map(|e| e.menu)
    }

    pub fn config(&self) -> &DropdownConfig {
        &self.inner.config
    }

    pub fn group(&self) -> &ExclusivityGroup {
        &self.inner.group
    }

    /// Check whether two handles refer to the same dropdown
    pub fn ptr_eq(&self, other: &Dropdown) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> WeakDropdown {
        WeakDropdown(Rc::downgrade(&self.inner))
    }
}

impl fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("container", &self.container())
            .field("config", &self.inner.config)
            .field("is_open", &self.is_open())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Resolve container, trigger, menu and close-on-select items
fn locate(doc: &Document, target: &ContainerRef) -> Result<(Elements, Vec<NodeId>), DropdownError> {
    let container = match target {
        ContainerRef::Node(node) => Some(*node).filter(|n| doc.tag_name(*n).is_some()),
        ContainerRef::Selector(selector) => doc.query_selector(doc.root(), selector)?,
    }
    .ok_or_else(|| DropdownError::ContainerNotFound(describe(target)))?;

    let trigger = doc
        .query_selector(container, TRIGGER_SELECTOR)?
        .ok_or(DropdownError::MissingTrigger)?;
    let menu = doc
        .query_selector(container, MENU_SELECTOR)?
        .ok_or(DropdownError::MissingMenu)?;
    let items = doc.query_selector_all(menu, ITEM_SELECTOR)?;

    Ok((Elements { container, trigger, menu }, items))
}

fn describe(target: &ContainerRef) -> String {
    match target {
        ContainerRef::Node(node) => format!("{:?}", node),
        ContainerRef::Selector(selector) => selector.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    struct Fixture {
        doc: Document,
        group: ExclusivityGroup,
        container: NodeId,
        trigger: NodeId,
        menu: NodeId,
        item: NodeId,
    }

    fn fixture() -> Fixture {
        let doc = Document::default();
        let container = doc.create_element("div");
        let trigger = doc.create_element("button");
        let menu = doc.create_element("div");
        let item = doc.create_element("a");
        doc.append_child(doc.body(), container).unwrap();
        doc.append_child(container, trigger).unwrap();
        doc.append_child(container, menu).unwrap();
        doc.append_child(menu, item).unwrap();
        doc.set_attribute(container, "id", "actions");
        doc.set_attribute(trigger, "data-dropdown-trigger", "");
        doc.set_attribute(menu, "data-dropdown-menu", "");
        Fixture {
            doc,
            group: ExclusivityGroup::new(),
            container,
            trigger,
            menu,
            item,
        }
    }

    impl Fixture {
        fn dropdown(&self, config: DropdownConfig) -> Dropdown {
            Dropdown::try_new_in(&self.group, &self.doc, self.container, config).unwrap()
        }
    }

    #[test]
    fn test_construction_hides_menu() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default());

        assert!(!dropdown.is_open());
        assert!(dropdown.is_enabled());
        assert_eq!(f.doc.style_value(f.menu, "display").as_deref(), Some("none"));
        assert_eq!(dropdown.trigger(), Some(f.trigger));
        assert_eq!(dropdown.menu(), Some(f.menu));
        assert_eq!(f.group.len(), 1);
    }

    #[test]
    fn test_container_by_selector() {
        let f = fixture();
        let dropdown = Dropdown::try_new_in(&f.group, &f.doc, "#actions", DropdownConfig::default())
            .unwrap();
        assert_eq!(dropdown.container(), Some(f.container));
    }

    #[test]
    fn test_missing_container() {
        let f = fixture();
        let err = Dropdown::try_new_in(&f.group, &f.doc, "#nope", DropdownConfig::default())
            .unwrap_err();
        assert_eq!(err, DropdownError::ContainerNotFound("#nope".into()));
    }

    #[test]
    fn test_missing_trigger_gives_inert_instance() {
        let f = fixture();
        f.doc.remove_attribute(f.trigger, "data-dropdown-trigger");
        let dropdown = Dropdown::new_in(&f.group, &f.doc, f.container, DropdownConfig::default());

        assert!(!dropdown.is_enabled());
        assert_eq!(dropdown.error(), Some(&DropdownError::MissingTrigger));
        dropdown.open();
        assert!(!dropdown.is_open());
        assert_eq!(f.doc.total_listener_count(), 0);
        assert!(f.group.is_empty());
    }

    #[test]
    fn test_open_and_close_toggle_state() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default());

        dropdown.open();
        assert!(dropdown.is_open());
        assert!(f.doc.has_class(f.container, OPEN_CLASS));
        assert_eq!(f.doc.style_value(f.menu, "display").as_deref(), Some("block"));

        dropdown.close();
        assert!(!dropdown.is_open());
        assert!(!f.doc.has_class(f.container, OPEN_CLASS));
        assert_eq!(f.doc.style_value(f.menu, "display").as_deref(), Some("none"));
    }

    #[test]
    fn test_trigger_click_toggles() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default());

        assert!(!f.doc.click(f.trigger));
        assert!(dropdown.is_open());
        f.doc.click(f.trigger);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_hover_mode() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default().with_trigger_mode(TriggerMode::Hover));

        f.doc.click(f.trigger);
        assert!(!dropdown.is_open());
        f.doc.pointer_enter(f.container);
        assert!(dropdown.is_open());
        f.doc.pointer_leave(f.container);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_manual_mode_installs_no_pointer_listeners() {
        let f = fixture();
        let dropdown = f.dropdown(
            DropdownConfig::default()
                .with_trigger_mode(TriggerMode::Manual)
                .with_close_on_click_outside(false)
                .with_close_on_select(false),
        );

        assert_eq!(f.doc.total_listener_count(), 0);
        f.doc.click(f.trigger);
        assert!(!dropdown.is_open());
        dropdown.open();
        assert!(dropdown.is_open());
    }

    #[test]
    fn test_click_outside_closes() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default());
        let outside = f.doc.create_element("p");
        f.doc.append_child(f.doc.body(), outside).unwrap();

        dropdown.open();
        f.doc.click(f.menu);
        assert!(dropdown.is_open());
        f.doc.click(outside);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_item_click_closes_only_with_auto_close() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default().with_auto_close(false));

        dropdown.open();
        f.doc.click(f.item);
        assert!(dropdown.is_open());

        let g = fixture();
        let closing = g.dropdown(DropdownConfig::default());
        closing.open();
        g.doc.click(g.item);
        assert!(!closing.is_open());
    }

    #[test]
    fn test_update_position_while_open() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default().with_position(Position::TopEnd));

        dropdown.open();
        dropdown.update_position();
        assert!(dropdown.is_open());
        assert_eq!(f.doc.style_value(f.menu, "display").as_deref(), Some("block"));
        assert_eq!(f.doc.style_value(f.menu, "bottom").as_deref(), Some("100%"));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let f = fixture();
        let dropdown = f.dropdown(DropdownConfig::default());
        dropdown.open();

        dropdown.destroy();
        dropdown.destroy();

        assert!(dropdown.is_destroyed());
        assert!(!dropdown.is_open());
        assert_eq!(f.doc.style_value(f.container, "position"), None);
        assert_eq!(f.doc.get_attribute(f.menu, "style"), None);
        assert!(!f.doc.has_class(f.container, OPEN_CLASS));
        // only the close-on-select listener is left
        assert_eq!(f.doc.total_listener_count(), 1);
        assert!(f.group.is_empty());

        dropdown.open();
        assert!(!dropdown.is_open());
    }
}
