//! Bulk initialization from markup

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use eventdesk_dom::{Document, EventType, NodeId, Subscription};

use crate::{Dropdown, DropdownConfig, ExclusivityGroup, ROOT_ATTR};

/// Create a dropdown for every `[data-dropdown]` under `scope`
///
/// `scope` defaults to the whole document. Each instance is keyed by its
/// container's `id`; containers without one get `dropdown-{index}` (index
/// in match order), which is also written back as their `id`.
pub fn init_dropdowns(doc: &Document, scope: Option<NodeId>) -> HashMap<String, Dropdown> {
    init_dropdowns_in(doc, scope, &ExclusivityGroup::for_document(doc))
}

/// Like [`init_dropdowns`], in an explicit exclusivity group
pub fn init_dropdowns_in(
    doc: &Document,
    scope: Option<NodeId>,
    group: &ExclusivityGroup,
) -> HashMap<String, Dropdown> {
    let scope = scope.unwrap_or_else(|| doc.root());
    let containers = match doc.query_selector_all(scope, &format!("[{}]", ROOT_ATTR)) {
        Ok(containers) => containers,
        Err(err) => {
            tracing::error!("Failed to query dropdown containers: {}", err);
            return HashMap::new();
        }
    };

    let mut dropdowns = HashMap::with_capacity(containers.len());
    for (index, container) in containers.into_iter().enumerate() {
        let id = doc
            .get_attribute(container, "id")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("dropdown-{}", index));
        doc.set_attribute(container, "id", &id);

        let config = DropdownConfig::from_dataset(&doc.dataset(container));
        let dropdown = Dropdown::new_in(group, doc, container, config);
        if dropdowns.insert(id.clone(), dropdown).is_some() {
            tracing::warn!("Duplicate dropdown id {:?}, keeping the later one", id);
        }
    }

    tracing::debug!("Initialized {} dropdown(s)", dropdowns.len());
    dropdowns
}

#[derive(Default)]
struct AutoInitState {
    ran: Cell<bool>,
    dropdowns: RefCell<HashMap<String, Dropdown>>,
}

/// Pending initialization on `DOMContentLoaded`
pub struct AutoInit {
    state: Rc<AutoInitState>,
    subscription: Subscription,
}

impl AutoInit {
    /// Whether `DOMContentLoaded` has fired
    pub fn has_run(&self) -> bool {
        self.state.ran.get()
    }

    /// Instances created on load, empty before that
    pub fn dropdowns(&self) -> HashMap<String, Dropdown> {
        self.state.dropdowns.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Dropdown> {
        self.state.dropdowns.borrow().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.dropdowns.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop waiting for the event; returns false if already removed
    pub fn cancel(self) -> bool {
        self.subscription.unsubscribe()
    }
}

/// Run [`init_dropdowns`] over the whole document once it has loaded
pub fn init_on_content_loaded(doc: &Document) -> AutoInit {
    init_on_content_loaded_in(doc, &ExclusivityGroup::for_document(doc))
}

/// Like [`init_on_content_loaded`], in an explicit exclusivity group
pub fn init_on_content_loaded_in(doc: &Document, group: &ExclusivityGroup) -> AutoInit {
    let state = Rc::new(AutoInitState::default());

    let weak_doc = doc.downgrade();
    let group = group.clone();
    let shared = state.clone();
    let subscription = doc.add_event_listener(doc.root(), EventType::DOMContentLoaded, move |_| {
        if shared.ran.replace(true) {
            return;
        }
        if let Some(doc) = weak_doc.upgrade() {
            let dropdowns = init_dropdowns_in(&doc, None, &group);
            *shared.dropdowns.borrow_mut() = dropdowns;
        }
    });

    AutoInit {
        state,
        subscription,
    }
}
