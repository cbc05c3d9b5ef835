//! EventDesk HTML Parser
//!
//! Loads HTML5 markup into an [`eventdesk_dom::Document`] using html5ever.

mod parser;

pub use eventdesk_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a new document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot insert parsed markup: {0}")]
    Dom(#[from] eventdesk_dom::DomError),
}
