//! EventDesk Dropdown
//!
//! Trigger plus menu component for the EventDesk admin pages.
//!
//! A dropdown is bound to a container element holding a
//! `[data-dropdown-trigger]` and a `[data-dropdown-menu]`. It hides and
//! positions the menu with inline styles, keeps at most one dropdown of
//! its [`ExclusivityGroup`] open, and announces `dropdown:open` /
//! `dropdown:close` as bubbling events from the container.
//!
//! # Example
//! ```rust,ignore
//! use eventdesk_dropdown::{Dropdown, DropdownConfig, Position};
//!
//! let config = DropdownConfig::default().with_position(Position::TopEnd);
//! let dropdown = Dropdown::new(&doc, "#team-actions", config);
//! dropdown.open();
//! ```

mod builder;
mod config;
mod dropdown;
mod error;
pub mod events;
mod init;
mod position;
mod registry;

pub use builder::{BuiltDropdown, DropdownBuilder, MenuEntry, MenuItem};
pub use config::{DropdownConfig, Position, TriggerMode};
pub use dropdown::{ContainerRef, Dropdown};
pub use error::{ConfigError, DropdownError};
pub use init::{
    init_dropdowns, init_dropdowns_in, init_on_content_loaded, init_on_content_loaded_in, AutoInit,
};
pub use position::{Anchor, HorizontalAlign, Placement, MENU_OFFSET_PX, MENU_Z_INDEX};
pub use registry::ExclusivityGroup;

/// Attribute marking a dropdown container
pub const ROOT_ATTR: &str = "data-dropdown";

/// Selector for the trigger inside a container
pub const TRIGGER_SELECTOR: &str = "[data-dropdown-trigger]";

/// Selector for the menu inside a container
pub const MENU_SELECTOR: &str = "[data-dropdown-menu]";

/// Menu items wired for close-on-select
pub const ITEM_SELECTOR: &str = r#"a, button, [role="menuitem"]"#;

/// Class carried by the container while open
pub const OPEN_CLASS: &str = "dropdown-open";
