//! Element Query
//!
//! querySelector, querySelectorAll, closest and matches over a small
//! selector grammar: comma-separated compound selectors built from `*`,
//! tag names, `#id`, `.class`, `[attr]` and `[attr="value"]`. Combinators
//! (descendant, child, sibling) are not supported.

use crate::{DomError, DomTree, ElementData, NodeId};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl SimpleSelector {
    /// Check a single element against this selector
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.class_list.contains(class),
            Self::Attribute { name, value: None } => element.has_attr(name),
            Self::Attribute {
                name,
                value: Some(expected),
            } => element.attribute(name).as_deref() == Some(expected.as_str()),
        }
    }
}

/// All simple selectors must match (`button.dropdown-item[role="menuitem"]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    parts: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn parts(&self) -> &[SimpleSelector] {
        &self.parts
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.parts.iter().all(|p| p.matches(element))
    }
}

/// Any compound selector may match (`a, button`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<CompoundSelector>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let selectors = split_top_level(input)
            .into_iter()
            .map(|part| parse_compound(part, input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    pub fn selectors(&self) -> &[CompoundSelector] {
        &self.selectors
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }
}

/// Split on commas that are not inside `[...]`
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let end = chars[start..]
        .iter()
        .position(|&c| !is_ident_char(c))
        .map_or(chars.len(), |p| start + p);
    (chars[start..end].iter().collect(), end)
}

fn parse_compound(part: &str, whole: &str) -> Result<CompoundSelector, DomError> {
    let invalid = || DomError::InvalidSelector(whole.to_string());
    let chars: Vec<char> = part.trim().chars().collect();
    if chars.is_empty() {
        return Err(invalid());
    }

    let mut parts = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                parts.push(SimpleSelector::Universal);
                i += 1;
            }
            marker @ ('#' | '.') => {
                let (ident, next) = read_ident(&chars, i + 1);
                if ident.is_empty() {
                    return Err(invalid());
                }
                parts.push(if marker == '#' {
                    SimpleSelector::Id(ident)
                } else {
                    SimpleSelector::Class(ident)
                });
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|p| i + p)
                    .ok_or_else(invalid)?;
                let body: String = chars[i + 1..close].iter().collect();
                parts.push(parse_attribute(&body).ok_or_else(invalid)?);
                i = close + 1;
            }
            c if is_ident_char(c) && parts.is_empty() => {
                let (ident, next) = read_ident(&chars, i);
                parts.push(SimpleSelector::Tag(ident.to_ascii_lowercase()));
                i = next;
            }
            _ => return Err(invalid()),
        }
    }

    Ok(CompoundSelector { parts })
}

fn parse_attribute(body: &str) -> Option<SimpleSelector> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = ['"', '\'']
                .iter()
                .find_map(|&q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };

    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    Some(SimpleSelector::Attribute {
        name: name.to_ascii_lowercase(),
        value,
    })
}

/// Element query trait
pub trait ElementQuery {
    /// First descendant of `scope` matching the selector
    fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, DomError>;

    /// All descendants of `scope` matching the selector, in document order
    fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError>;

    /// Nearest inclusive ancestor matching the selector
    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>, DomError>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, DomError>;
}

impl DomTree {
    /// Descendants of `scope` matched by a pre-parsed selector list
    pub fn select_all(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.element(n).is_some_and(|e| selectors.matches(e)))
            .collect()
    }
}

impl ElementQuery for DomTree {
    fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selectors = SelectorList::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|&n| self.element(n).is_some_and(|e| selectors.matches(e))))
    }

    fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selectors = SelectorList::parse(selector)?;
        Ok(self.select_all(scope, &selectors))
    }

    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selectors = SelectorList::parse(selector)?;
        Ok(std::iter::once(element)
            .chain(self.ancestors(element))
            .find(|&n| self.element(n).is_some_and(|e| selectors.matches(e))))
    }

    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, DomError> {
        let selectors = SelectorList::parse(selector)?;
        Ok(self.element(element).is_some_and(|e| selectors.matches(e)))
    }
}
