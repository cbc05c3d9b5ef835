//! Lifecycle notifications
//!
//! Both events bubble from the container and cannot be canceled, so a
//! listener anywhere on the ancestor chain (usually the document node)
//! sees every dropdown of the page.

use eventdesk_dom::EventType;

/// Dispatched after a dropdown opened
pub const OPENED: &str = "dropdown:open";

/// Dispatched after a dropdown closed
pub const CLOSED: &str = "dropdown:close";

/// `dropdown:open` as an event type for `add_event_listener`
pub fn opened() -> EventType {
    EventType::custom(OPENED)
}

/// `dropdown:close` as an event type for `add_event_listener`
pub fn closed() -> EventType {
    EventType::custom(CLOSED)
}
