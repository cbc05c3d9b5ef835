//! Exclusivity groups
//!
//! Members are held weakly; a dropdown that is no longer referenced by
//! either a host handle or one of its own listeners simply drops out.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use eventdesk_dom::{Document, WeakDocument};

use crate::dropdown::{Dropdown, WeakDropdown};

thread_local! {
    static DEFAULTS: RefCell<Vec<(WeakDocument, ExclusivityGroup)>> = const { RefCell::new(Vec::new()) };
}

/// Set of dropdowns of which at most one is open
#[derive(Clone, Default)]
pub struct ExclusivityGroup {
    members: Rc<RefCell<Vec<WeakDropdown>>>,
}

impl ExclusivityGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default group of `doc`
    ///
    /// Dropdowns in different documents never close each other. Entries
    /// for dropped documents are pruned on lookup.
    pub fn for_document(doc: &Document) -> Self {
        DEFAULTS.with(|defaults| {
            let mut defaults = defaults.borrow_mut();
            defaults.retain(|(weak, _)| weak.upgrade().is_some());
            let existing = defaults
                .iter()
                .find(|(weak, _)| weak.upgrade().is_some_and(|d| d.ptr_eq(doc)))
                .map(|(_, group)| group.clone());
            existing.unwrap_or_else(|| {
                let group = Self::new();
                defaults.push((doc.downgrade(), group.clone()));
                group
            })
        })
    }

    pub fn ptr_eq(&self, other: &ExclusivityGroup) -> bool {
        Rc::ptr_eq(&self.members, &other.members)
    }

    pub fn register(&self, dropdown: &Dropdown) {
        let mut members = self.members.borrow_mut();
        members.retain(WeakDropdown::is_alive);
        if !members.iter().any(|m| m.points_to(dropdown)) {
            members.push(dropdown.downgrade());
        }
    }

    /// Remove a member, returns false if it was not registered
    pub fn deregister(&self, dropdown: &Dropdown) -> bool {
        let mut members = self.members.borrow_mut();
        let found = members.iter().any(|m| m.points_to(dropdown));
        members.retain(|m| m.is_alive() && !m.points_to(dropdown));
        found
    }

    /// Close every open member except `except` without notifications
    ///
    /// Returns how many members were closed.
    pub fn close_others(&self, except: &Dropdown) -> usize {
        let others: Vec<Dropdown> = self
            .members()
            .into_iter()
            .filter(|d| !d.ptr_eq(except) && d.is_open())
            .collect();
        for dropdown in &others {
            dropdown.force_close();
        }
        if !others.is_empty() {
            tracing::debug!("Closed {} other dropdown(s)", others.len());
        }
        others.len()
    }

    /// Members that are currently open
    pub fn open_members(&self) -> Vec<Dropdown> {
        self.members().into_iter().filter(Dropdown::is_open).collect()
    }

    /// Live members in registration order
    pub fn members(&self) -> Vec<Dropdown> {
        self.members
            .borrow()
            .iter()
            .filter_map(WeakDropdown::upgrade)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().iter().filter(|m| m.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ExclusivityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusivityGroup")
            .field("members", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DropdownConfig;
    use eventdesk_dom::Document;

    fn add_dropdown(doc: &Document, group: &ExclusivityGroup) -> Dropdown {
        let container = doc.create_element("div");
        let trigger = doc.create_element("button");
        let menu = doc.create_element("div");
        doc.append_child(doc.body(), container).unwrap();
        doc.append_child(container, trigger).unwrap();
        doc.append_child(container, menu).unwrap();
        doc.set_attribute(trigger, "data-dropdown-trigger", "");
        doc.set_attribute(menu, "data-dropdown-menu", "");
        Dropdown::try_new_in(group, doc, container, DropdownConfig::default()).unwrap()
    }

    #[test]
    fn test_register_is_idempotent() {
        let doc = Document::default();
        let group = ExclusivityGroup::new();
        let a = add_dropdown(&doc, &group);

        group.register(&a);
        assert_eq!(group.len(), 1);
        assert!(group.deregister(&a));
        assert!(!group.deregister(&a));
        assert!(group.is_empty());
    }

    #[test]
    fn test_close_others_skips_except() {
        let doc = Document::default();
        let group = ExclusivityGroup::new();
        let a = add_dropdown(&doc, &group);
        let b = add_dropdown(&doc, &group);

        a.open();
        assert_eq!(group.close_others(&b), 1);
        assert!(!a.is_open());
        assert_eq!(group.close_others(&b), 0);
    }

    #[test]
    fn test_groups_are_independent() {
        let doc = Document::default();
        let left = ExclusivityGroup::new();
        let right = ExclusivityGroup::new();
        let a = add_dropdown(&doc, &left);
        let b = add_dropdown(&doc, &right);

        a.open();
        b.open();
        assert!(a.is_open());
        assert_eq!(left.open_members().len(), 1);
        assert_eq!(right.open_members().len(), 1);
        assert!(!left.ptr_eq(&right));
    }

    #[test]
    fn test_default_group_per_document() {
        let first = Document::default();
        let second = Document::default();

        let group = ExclusivityGroup::for_document(&first);
        assert!(group.ptr_eq(&ExclusivityGroup::for_document(&first)));
        assert!(!group.ptr_eq(&ExclusivityGroup::for_document(&second)));
    }

    #[test]
    fn test_documents_do_not_close_each_other() {
        let first = Document::default();
        let second = Document::default();
        let a = add_dropdown(&first, &ExclusivityGroup::for_document(&first));
        let b = add_dropdown(&second, &ExclusivityGroup::for_document(&second));

        a.open();
        b.open();
        assert!(a.is_open());
        assert!(b.is_open());
    }
}
