//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to our DOM format.

use eventdesk_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = self.read(html)?;
        let document = Document::empty(url);
        {
            let mut tree = document.tree_mut();
            let root = tree.root();
            self.convert_node(&dom.document, &mut tree, root)?;
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse a body fragment and append its top-level nodes to `parent`
    ///
    /// Returns the IDs of the appended top-level nodes.
    pub fn parse_fragment_into(
        &self,
        document: &Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let dom = self.read(html)?;
        let Some(body) = find_child_element(&dom.document, "html")
            .and_then(|html| find_child_element(&html, "body"))
        else {
            return Ok(Vec::new());
        };

        let mut tree = document.tree_mut();
        let mut added = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, &mut tree, parent)? {
                added.push(id);
            }
        }
        Ok(added)
    }

    fn read(&self, html: &str) -> Result<RcDom, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node (and its subtree) under `parent`
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
    ) -> Result<Option<NodeId>, ParseError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
                Ok(None)
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return Ok(None);
                }
                let id = tree.create_text(&text);
                tree.append_child(parent, id)?;
                Ok(Some(id))
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
                Ok(Some(id))
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
                Ok(Some(id))
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => Ok(None),
        }
    }
}

fn find_child_element(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Events</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.body().is_valid());
        assert_eq!(doc.title(), "Events");
    }

    #[test]
    fn test_parse_fragment_gets_skeleton() {
        let doc = HtmlParser::new().parse("<div id=\"x\"><span>Text</span></div>").unwrap();

        let div = doc.get_element_by_id("x").unwrap();
        assert_eq!(doc.tree().parent(div), Some(doc.body()));
        assert_eq!(doc.text_content(div), "Text");
    }

    #[test]
    fn test_attributes_are_kept() {
        let html = r#"<div data-dropdown data-dropdown-position="top-end" class="dropdown actions" style="color: red"></div>"#;
        let doc = HtmlParser::new().parse(html).unwrap();
        let div = doc.query_selector(doc.root(), "[data-dropdown]").unwrap().unwrap();

        assert_eq!(doc.dataset(div).get("dropdownPosition"), Some("top-end"));
        assert!(doc.has_class(div, "actions"));
        assert_eq!(doc.style_value(div, "color").as_deref(), Some("red"));
    }

    #[test]
    fn test_parse_fragment_into_existing_document() {
        let doc = Document::new("about:blank");
        let added = HtmlParser::new()
            .parse_fragment_into(&doc, doc.body(), "<button>One</button><button>Two</button>")
            .unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(doc.text_content(added[1]), "Two");
        assert_eq!(doc.tree().parent(added[0]), Some(doc.body()));
    }
}
