//! Programmatic dropdown construction
//!
//! Builds the standard dropdown markup (`div.dropdown` with a
//! `button.dropdown-trigger` and a `div.dropdown-menu`), attaches it to
//! the document and wires a click-mode [`Dropdown`] onto it.

use std::fmt;
use std::rc::Rc;

use eventdesk_dom::{Document, Event, EventType, Listener, NodeId, Subscription, WeakDocument};
use eventdesk_html::HtmlParser;

use crate::{Dropdown, DropdownConfig, DropdownError, ExclusivityGroup, Position, TriggerMode};

const DEFAULT_TRIGGER_LABEL: &str = "Select an option";
const ARROW: &str = "\u{25BC}";

/// One row of a built menu
#[derive(Debug, Clone)]
pub enum MenuEntry {
    /// `<hr>`
    Divider,
    /// `div.dropdown-header`
    Header(String),
    Item(MenuItem),
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        Self::Item(item)
    }
}

/// Selectable menu item, rendered as `a` with an href or `button` without
#[derive(Clone, Default)]
pub struct MenuItem {
    pub text: String,
    pub icon: Option<String>,
    pub href: Option<String>,
    /// Written to `data-id`
    pub data_id: Option<String>,
    pub class_name: Option<String>,
    pub on_click: Option<Listener>,
    pub disabled: bool,
    pub danger: bool,
}

impl MenuItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Icon class added to `span.dropdown-item-icon`
    pub fn icon(mut self, class: impl Into<String>) -> Self {
        self.icon = Some(class.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn data_id(mut self, id: impl Into<String>) -> Self {
        self.data_id = Some(id.into());
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    pub fn on_click(mut self, callback: impl Fn(&mut Event) + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn danger(mut self, danger: bool) -> Self {
        self.danger = danger;
        self
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("text", &self.text)
            .field("icon", &self.icon)
            .field("href", &self.href)
            .field("data_id", &self.data_id)
            .field("class_name", &self.class_name)
            .field("on_click", &self.on_click.is_some())
            .field("disabled", &self.disabled)
            .field("danger", &self.danger)
            .finish()
    }
}

/// Builder for a dropdown and its markup
#[derive(Debug, Clone)]
pub struct DropdownBuilder {
    id: String,
    trigger_label: String,
    entries: Vec<MenuEntry>,
    position: Position,
    trigger_class: String,
    menu_class: String,
    parent: Option<NodeId>,
    group: Option<ExclusivityGroup>,
}

impl DropdownBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trigger_label: DEFAULT_TRIGGER_LABEL.to_string(),
            entries: Vec::new(),
            position: Position::default(),
            trigger_class: String::new(),
            menu_class: String::new(),
            parent: None,
            group: None,
        }
    }

    /// Trigger content, parsed as markup
    pub fn trigger_label(mut self, label: impl Into<String>) -> Self {
        self.trigger_label = label.into();
        self
    }

    pub fn entry(mut self, entry: impl Into<MenuEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = MenuEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn item(self, item: MenuItem) -> Self {
        self.entry(item)
    }

    pub fn header(self, text: impl Into<String>) -> Self {
        self.entry(MenuEntry::Header(text.into()))
    }

    pub fn divider(self) -> Self {
        self.entry(MenuEntry::Divider)
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Extra classes for the `div.dropdown` container that wraps the trigger
    pub fn trigger_class(mut self, class: impl Into<String>) -> Self {
        self.trigger_class = class.into();
        self
    }

    /// Extra classes for the menu
    pub fn menu_class(mut self, class: impl Into<String>) -> Self {
        self.menu_class = class.into();
        self
    }

    /// Element to append to; defaults to `<body>`
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Exclusivity group; defaults to the document's own group
    pub fn group(mut self, group: ExclusivityGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Create the markup, attach it and wire the dropdown
    ///
    /// On failure nothing is left behind: item callbacks are removed and
    /// the partial markup is detached.
    pub fn build(self, doc: &Document) -> Result<BuiltDropdown, DropdownError> {
        let element = doc.create_element("div");
        let mut callbacks = Vec::new();

        match self.assemble(doc, element, &mut callbacks) {
            Ok((trigger, menu, instance)) => {
                tracing::debug!("Built dropdown #{} with {} entries", self.id, self.entries.len());
                Ok(BuiltDropdown {
                    element,
                    trigger,
                    menu,
                    instance,
                    doc: doc.downgrade(),
                    callbacks,
                })
            }
            Err(err) => {
                for callback in callbacks {
                    callback.unsubscribe();
                }
                doc.remove(element);
                tracing::warn!("Failed to build dropdown #{}: {}", self.id, err);
                Err(err)
            }
        }
    }

    fn assemble(
        &self,
        doc: &Document,
        element: NodeId,
        callbacks: &mut Vec<Subscription>,
    ) -> Result<(NodeId, NodeId, Dropdown), DropdownError> {
        doc.set_attribute(element, "class", &class_names(&["dropdown", &self.trigger_class]));
        doc.set_attribute(element, "id", &self.id);
        doc.set_attribute(element, "data-dropdown", "");
        doc.set_attribute(element, "data-dropdown-position", self.position.as_str());

        // the label is markup, so it may carry an icon
        let trigger = doc.create_element("button");
        doc.set_attribute(trigger, "class", "dropdown-trigger");
        doc.set_attribute(trigger, "data-dropdown-trigger", "");
        HtmlParser::new().parse_fragment_into(
            doc,
            trigger,
            &format!("{} <span class=\"dropdown-arrow\">{}</span>", self.trigger_label, ARROW),
        )?;

        let menu = doc.create_element("div");
        doc.set_attribute(menu, "class", &class_names(&["dropdown-menu", &self.menu_class]));
        doc.set_attribute(menu, "data-dropdown-menu", "");

        for entry in &self.entries {
            let node = match entry {
                MenuEntry::Divider => doc.create_element("hr"),
                MenuEntry::Header(text) => element_with_text(doc, "div", "dropdown-header", text)?,
                MenuEntry::Item(item) => {
                    let (node, callback) = build_item(doc, item)?;
                    callbacks.extend(callback);
                    node
                }
            };
            doc.append_child(menu, node)?;
        }

        doc.append_child(element, trigger)?;
        doc.append_child(element, menu)?;
        doc.append_child(self.parent.unwrap_or_else(|| doc.body()), element)?;

        let config = DropdownConfig::default()
            .with_position(self.position)
            .with_trigger_mode(TriggerMode::Click);
        let group = self
            .group
            .clone()
            .unwrap_or_else(|| ExclusivityGroup::for_document(doc));
        let instance = Dropdown::try_new_in(&group, doc, element, config)?;
        Ok((trigger, menu, instance))
    }
}

fn build_item(doc: &Document, item: &MenuItem) -> Result<(NodeId, Option<Subscription>), DropdownError> {
    let node = doc.create_element(if item.href.is_some() { "a" } else { "button" });
    let danger = if item.danger { "dropdown-item-danger" } else { "" };
    doc.set_attribute(
        node,
        "class",
        &class_names(&["dropdown-item", item.class_name.as_deref().unwrap_or(""), danger]),
    );
    doc.set_attribute(node, "role", "menuitem");

    if let Some(href) = &item.href {
        doc.set_attribute(node, "href", href);
    }
    if let Some(id) = &item.data_id {
        doc.set_attribute(node, "data-id", id);
    }
    if item.disabled {
        doc.set_attribute(node, "disabled", "");
    }

    if let Some(icon) = &item.icon {
        let span = doc.create_element("span");
        doc.set_attribute(span, "class", &class_names(&["dropdown-item-icon", icon]));
        doc.append_child(node, span)?;
    }
    let text = element_with_text(doc, "span", "dropdown-item-text", &item.text)?;
    doc.append_child(node, text)?;

    let callback = item.on_click.clone().map(|listener| {
        doc.add_event_listener(node, EventType::Click, move |e| listener(e))
    });
    Ok((node, callback))
}

fn element_with_text(doc: &Document, tag: &str, class: &str, text: &str) -> Result<NodeId, DropdownError> {
    let node = doc.create_element(tag);
    doc.set_attribute(node, "class", class);
    let text = doc.create_text(text);
    doc.append_child(node, text)?;
    Ok(node)
}

/// Join non-empty class fragments with single spaces
fn class_names(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result of [`DropdownBuilder::build`]
#[derive(Debug)]
pub struct BuiltDropdown {
    pub element: NodeId,
    pub trigger: NodeId,
    pub menu: NodeId,
    pub instance: Dropdown,
    doc: WeakDocument,
    callbacks: Vec<Subscription>,
}

impl BuiltDropdown {
    /// Destroy the instance and remove its markup from the document
    pub fn destroy(self) {
        self.instance.destroy();
        for callback in self.callbacks {
            callback.unsubscribe();
        }
        if let Some(doc) = self.doc.upgrade() {
            doc.remove(self.element);
        }
    }
}
