//! EventDesk UI
//!
//! Dropdown menus for the school-events admin pages, running on a small
//! headless DOM.
//!
//! # Example
//! ```rust,ignore
//! use eventdesk::{Config, Page};
//!
//! let page = Page::load(html, &Config::default())?;
//! if let Some(actions) = page.dropdown("team-actions") {
//!     actions.open();
//! }
//! ```

mod config;
mod page;

pub use config::Config;
pub use page::{DropdownSummary, Page, PageError};

// Re-export sub-crates for advanced usage
pub use eventdesk_dom as dom;
pub use eventdesk_dropdown as dropdown;
pub use eventdesk_html as html;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
