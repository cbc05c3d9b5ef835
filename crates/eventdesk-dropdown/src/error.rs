//! Dropdown errors

use eventdesk_dom::DomError;
use eventdesk_html::ParseError;

/// Construction failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropdownError {
    #[error("Dropdown container not found: {0}")]
    ContainerNotFound(String),

    #[error("Dropdown is missing its trigger ([data-dropdown-trigger])")]
    MissingTrigger,

    #[error("Dropdown is missing its menu ([data-dropdown-menu])")]
    MissingMenu,

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid dropdown markup: {0}")]
    Markup(String),
}

impl From<ParseError> for DropdownError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Dom(err) => Self::Dom(err),
            err => Self::Markup(err.to_string()),
        }
    }
}

/// Strict parsing failures for config values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown dropdown position: {0:?}")]
    UnknownPosition(String),

    #[error("Unknown dropdown trigger: {0:?}")]
    UnknownTrigger(String),
}
