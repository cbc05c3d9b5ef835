//! Integration tests for EventDesk UI
//!
//! Whole pages loaded through `Page` and driven with simulated input.

use std::cell::RefCell;
use std::rc::Rc;

use eventdesk::dom::EventType;
use eventdesk::dropdown::{events, DropdownBuilder, MenuItem, Position, OPEN_CLASS};
use eventdesk::{Config, Page};

const ADMIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Admin</title></head>
<body>
  <nav id="toolbar">
    <div id="events-menu" class="dropdown" data-dropdown>
      <button data-dropdown-trigger>Events</button>
      <div data-dropdown-menu>
        <a href="/events/new">New</a>
        <a href="/events">All events</a>
      </div>
    </div>
    <div id="user-menu" class="dropdown" data-dropdown data-dropdown-position="bottom-end"
         data-dropdown-close-on-click-outside="false">
      <button data-dropdown-trigger>Account</button>
      <div data-dropdown-menu><button>Sign out</button></div>
    </div>
  </nav>
  <section id="content"><h1>Dashboard</h1></section>
</body>
</html>"#;

fn load() -> Page {
    Page::load(ADMIN_PAGE, &Config::default().with_url("https://events.example/admin")).unwrap()
}

// ============================================================================
// LOADING
// ============================================================================

#[test]
fn test_page_load() {
    let page = load();

    assert_eq!(page.title(), "Admin");
    assert_eq!(page.url.as_str(), "https://events.example/admin");
    assert_eq!(page.document.url(), "https://events.example/admin");
    assert_eq!(page.dropdown_ids(), vec!["events-menu", "user-menu"]);
    assert_eq!(
        page.dropdown("user-menu").unwrap().config().position,
        Position::BottomEnd
    );
}

#[test]
fn test_config_from_json_drives_load() {
    let config = Config::from_json(r#"{"auto_init_dropdowns": false}"#).unwrap();
    let page = Page::load(ADMIN_PAGE, &config).unwrap();
    assert!(page.dropdowns().is_empty());
}

// ============================================================================
// INTERACTION
// ============================================================================

#[test]
fn test_only_one_menu_open() {
    let page = load();
    let doc = &page.document;
    let events_menu = page.dropdown("events-menu").unwrap();
    let user_menu = page.dropdown("user-menu").unwrap();

    doc.click(events_menu.trigger().unwrap());
    assert_eq!(page.open_dropdowns(), vec!["events-menu"]);

    doc.click(user_menu.trigger().unwrap());
    assert_eq!(page.open_dropdowns(), vec!["user-menu"]);
    assert!(!doc.has_class(events_menu.container().unwrap(), OPEN_CLASS));
}

#[test]
fn test_click_outside_respects_markup_flag() {
    let page = load();
    let doc = &page.document;
    let content = doc.get_element_by_id("content").unwrap();
    let events_menu = page.dropdown("events-menu").unwrap();
    let user_menu = page.dropdown("user-menu").unwrap();

    events_menu.open();
    doc.click(content);
    assert!(!events_menu.is_open());

    user_menu.open();
    doc.click(content);
    assert!(user_menu.is_open());
}

#[test]
fn test_host_listens_for_lifecycle_events() {
    let page = load();
    let doc = &page.document;
    let log = Rc::new(RefCell::new(Vec::new()));

    let toolbar = doc.get_element_by_id("toolbar").unwrap();
    for event_type in [events::opened(), events::closed()] {
        let log = log.clone();
        let handle = doc.clone();
        let _sub = doc.add_event_listener(toolbar, event_type, move |e| {
            let id = handle.get_attribute(e.target, "id").unwrap_or_default();
            log.borrow_mut().push(format!("{} {}", e.event_type, id));
        });
    }

    let events_menu = page.dropdown("events-menu").unwrap();
    let user_menu = page.dropdown("user-menu").unwrap();
    events_menu.open();
    user_menu.open();
    user_menu.close();

    assert_eq!(
        *log.borrow(),
        vec![
            "dropdown:open events-menu",
            "dropdown:open user-menu",
            "dropdown:close user-menu",
        ]
    );
}

#[test]
fn test_built_dropdown_joins_page_group() {
    let mut page = load();
    let toolbar = page.document.get_element_by_id("toolbar").unwrap();
    let chosen = Rc::new(RefCell::new(None));
    let slot = chosen.clone();

    let built = page
        .build_dropdown(
            DropdownBuilder::new("team-menu")
                .trigger_label("Teams")
                .parent(toolbar)
                .header("Teams")
                .item(MenuItem::new("Blue").data_id("blue").on_click(move |e| {
                    *slot.borrow_mut() = Some(e.target);
                }))
                .divider()
                .item(MenuItem::new("Delete all").danger(true).disabled(true)),
        )
        .unwrap();

    page.dropdown("events-menu").unwrap().open();
    page.document.click(built.trigger);
    assert_eq!(page.open_dropdowns(), vec!["team-menu"]);

    let blue = page
        .document
        .query_selector(built.menu, "[data-id=\"blue\"]")
        .unwrap()
        .unwrap();
    page.document.click(blue);
    assert_eq!(*chosen.borrow(), Some(blue));
    assert!(page.open_dropdowns().is_empty());

    built.destroy();
    assert_eq!(page.document.get_element_by_id("team-menu"), None);
    assert_eq!(page.group().len(), 2);
}

#[test]
fn test_destroyed_dropdown_leaves_document_listeners() {
    let page = load();
    let doc = &page.document;
    let before = doc.listener_count(doc.root(), &EventType::Click);

    page.dropdown("events-menu").unwrap().destroy();
    assert_eq!(doc.listener_count(doc.root(), &EventType::Click), before - 1);
    doc.click(doc.get_element_by_id("content").unwrap());
}
