//! Page - A loaded document with its dropdowns

use std::collections::HashMap;

use eventdesk_dom::Document;
use eventdesk_dropdown::{
    init_on_content_loaded_in, BuiltDropdown, Dropdown, DropdownBuilder, DropdownError,
    ExclusivityGroup, Position, TriggerMode,
};
use eventdesk_html::{HtmlParser, ParseError};
use serde::Serialize;
use url::Url;

use crate::Config;

/// Page loading errors
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Invalid page URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to parse page: {0}")]
    Parse(#[from] ParseError),
}

/// One dropdown as reported by [`Page::summary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownSummary {
    pub id: String,
    pub position: Position,
    pub trigger: TriggerMode,
    pub enabled: bool,
    pub open: bool,
}

/// A loaded page
pub struct Page {
    pub url: Url,
    pub document: Document,
    group: ExclusivityGroup,
    dropdowns: HashMap<String, Dropdown>,
}

impl Page {
    /// Parse markup and, unless disabled, initialize its dropdowns by
    /// firing `DOMContentLoaded`
    pub fn load(html: &str, config: &Config) -> Result<Self, PageError> {
        let url = Url::parse(&config.url).map_err(|source| PageError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;
        let document = HtmlParser::new().parse_with_url(html, url.as_str())?;

        let group = ExclusivityGroup::for_document(&document);
        let auto_init = config
            .auto_init_dropdowns
            .then(|| init_on_content_loaded_in(&document, &group));
        document.fire_content_loaded();
        let dropdowns = auto_init.map(|auto| auto.dropdowns()).unwrap_or_default();

        tracing::info!("Loaded {} with {} dropdown(s)", url, dropdowns.len());
        Ok(Self {
            url,
            document,
            group,
            dropdowns,
        })
    }

    /// Get the page title
    pub fn title(&self) -> String {
        self.document.title()
    }

    pub fn dropdown(&self, id: &str) -> Option<&Dropdown> {
        self.dropdowns.get(id)
    }

    pub fn dropdowns(&self) -> &HashMap<String, Dropdown> {
        &self.dropdowns
    }

    /// Dropdown ids, sorted
    pub fn dropdown_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.dropdowns.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of the open dropdowns; at most one
    pub fn open_dropdowns(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .dropdowns
            .iter()
            .filter(|(_, d)| d.is_open())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn group(&self) -> &ExclusivityGroup {
        &self.group
    }

    /// Build a dropdown into this page's exclusivity group and track it
    pub fn build_dropdown(&mut self, builder: DropdownBuilder) -> Result<BuiltDropdown, DropdownError> {
        let built = builder.group(self.group.clone()).build(&self.document)?;
        if let Some(id) = self.document.get_attribute(built.element, "id") {
            self.dropdowns.insert(id, built.instance.clone());
        }
        Ok(built)
    }

    /// Per-dropdown report, sorted by id
    pub fn summary(&self) -> Vec<DropdownSummary> {
        self.dropdown_ids()
            .into_iter()
            .filter_map(|id| {
                let dropdown = self.dropdowns.get(id)?;
                let config = dropdown.config();
                Some(DropdownSummary {
                    id: id.to_string(),
                    position: config.position,
                    trigger: config.trigger_mode,
                    enabled: dropdown.is_enabled(),
                    open: dropdown.is_open(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<html><head><title>Teams</title></head><body>
        <div id="team-actions" data-dropdown data-dropdown-position="bottom-end">
            <button data-dropdown-trigger>Actions</button>
            <div data-dropdown-menu><button>Rename</button></div>
        </div>
        <div data-dropdown><button data-dropdown-trigger>Broken</button></div>
    </body></html>"#;

    #[test]
    fn test_load_initializes_dropdowns() {
        let page = Page::load(HTML, &Config::default()).unwrap();

        assert_eq!(page.title(), "Teams");
        assert_eq!(page.dropdown_ids(), vec!["dropdown-1", "team-actions"]);
        assert!(page.dropdown("team-actions").unwrap().is_enabled());
        assert!(!page.dropdown("dropdown-1").unwrap().is_enabled());
        assert_eq!(page.group().len(), 1);
    }

    #[test]
    fn test_load_without_auto_init() {
        let page = Page::load(HTML, &Config::default().with_auto_init(false)).unwrap();
        assert!(page.dropdowns().is_empty());
        assert!(page.group().is_empty());
    }

    #[test]
    fn test_pages_do_not_close_each_other() {
        let first = Page::load(HTML, &Config::default()).unwrap();
        let second = Page::load(HTML, &Config::default()).unwrap();
        let a = first.dropdown("team-actions").unwrap();
        let b = second.dropdown("team-actions").unwrap();

        a.open();
        b.open();
        assert!(a.is_open());
        assert!(b.is_open());
        assert!(!first.group().ptr_eq(second.group()));
    }

    #[test]
    fn test_invalid_url() {
        let err = Page::load(HTML, &Config::default().with_url("not a url")).err().unwrap();
        assert!(matches!(err, PageError::InvalidUrl { .. }));
    }

    #[test]
    fn test_summary() {
        let page = Page::load(HTML, &Config::default()).unwrap();
        let summary = page.summary();

        assert_eq!(summary.len(), 2);
        assert_eq!(
            summary[1],
            DropdownSummary {
                id: "team-actions".into(),
                position: Position::BottomEnd,
                trigger: TriggerMode::Click,
                enabled: true,
                open: false,
            }
        );
    }
}
