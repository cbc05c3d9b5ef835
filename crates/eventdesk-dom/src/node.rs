//! DOM Node
//!
//! Nodes link to each other through `NodeId`s instead of pointers, so the
//! whole tree lives in one arena and can be borrowed as a unit.

use std::borrow::Cow;

use crate::{CSSStyleDeclaration, DOMStringMap, DOMTokenList, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::with_data(NodeData::Comment(content.to_string()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this node may have children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Element(_) | NodeData::Document)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Plain attribute (everything except `class` and `style`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
///
/// `class` and `style` are reflected into [`DOMTokenList`] and
/// [`CSSStyleDeclaration`]; every other attribute is stored verbatim.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-case tag name
    pub tag: String,
    attrs: Vec<Attribute>,
    /// `classList`
    pub class_list: DOMTokenList,
    /// Inline `style`
    pub style: CSSStyleDeclaration,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            class_list: DOMTokenList::new(),
            style: CSSStyleDeclaration::new(),
        }
    }

    /// Get a plain attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Get any attribute value, including the reflected `class` and `style`
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        match name.to_ascii_lowercase().as_str() {
            "class" if !self.class_list.is_empty() => Some(Cow::Owned(self.class_list.value())),
            "style" if !self.style.is_empty() => Some(Cow::Owned(self.style.css_text())),
            "class" | "style" => None,
            other => self.get_attr(other).map(Cow::Borrowed),
        }
    }

    /// Check whether an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.class_list.set_value(value),
            "style" => self.style.set_css_text(value),
            _ => {
                if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
                    attr.value = value.to_string();
                } else {
                    self.attrs.push(Attribute {
                        name,
                        value: value.to_string(),
                    });
                }
            }
        }
    }

    /// Remove an attribute, returns whether it existed
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => {
                let had = !self.class_list.is_empty();
                self.class_list.set_value("");
                had
            }
            "style" => {
                let had = !self.style.is_empty();
                self.style.clear();
                had
            }
            _ => {
                let before = self.attrs.len();
                self.attrs.retain(|a| a.name != name);
                self.attrs.len() < before
            }
        }
    }

    /// Plain attributes in insertion order
    pub fn attrs(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// `dataset` view built from the `data-*` attributes
    pub fn dataset(&self) -> DOMStringMap {
        DOMStringMap::from_attributes(self.attrs.iter().map(|a| (a.name.as_str(), a.value.as_str())))
    }

    /// Form controls honour the `disabled` attribute
    pub fn is_disabled(&self) -> bool {
        matches!(
            self.tag.as_str(),
            "button" | "input" | "select" | "textarea" | "option" | "fieldset"
        ) && self.get_attr("disabled").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_case_insensitive() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag, "div");

        elem.set_attr("Data-Dropdown", "");
        assert_eq!(elem.get_attr("data-dropdown"), Some(""));
        assert!(elem.has_attr("DATA-DROPDOWN"));
    }

    #[test]
    fn test_class_and_style_are_reflected() {
        let mut elem = ElementData::new("div");
        elem.set_attr("class", "dropdown  dropdown-open");
        elem.set_attr("style", "position: relative; display: none");

        assert!(elem.class_list.contains("dropdown-open"));
        assert_eq!(elem.style.get_property_value("display"), Some("none"));
        assert_eq!(elem.attribute("class").as_deref(), Some("dropdown dropdown-open"));
        assert_eq!(elem.attrs().count(), 0);

        assert!(elem.remove_attr("class"));
        assert!(elem.attribute("class").is_none());
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut elem = ElementData::new("a");
        elem.set_attr("href", "/events");
        elem.set_attr("href", "/teams");
        assert_eq!(elem.get_attr("href"), Some("/teams"));
        assert_eq!(elem.attrs().count(), 1);
    }

    #[test]
    fn test_disabled_only_applies_to_form_controls() {
        let mut button = ElementData::new("button");
        button.set_attr("disabled", "");
        assert!(button.is_disabled());

        let mut link = ElementData::new("a");
        link.set_attr("disabled", "");
        assert!(!link.is_disabled());
    }
}
