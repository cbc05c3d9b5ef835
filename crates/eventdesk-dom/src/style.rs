//! Inline style declarations
//!
//! Ordered `property: value` pairs of an element's `style` attribute.
//! Values are kept as strings; nothing here computes layout.

/// CSSStyleDeclaration (element.style)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CSSStyleDeclaration {
    properties: Vec<(String, String)>,
}

impl CSSStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property value
    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property; an empty value removes it, as `style.x = ''` does
    pub fn set_property(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(name);
            return;
        }

        let name = name.trim().to_ascii_lowercase();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name, value.to_string())),
        }
    }

    /// Remove a property, returning its old value
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let pos = self
            .properties
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.properties.remove(pos).1)
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialize as `a: b; c: d`
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Replace all declarations from `a: b; c: d`
    pub fn set_css_text(&mut self, text: &str) {
        self.clear();
        for declaration in text.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                if !name.trim().is_empty() {
                    self.set_property(name, value);
                }
            }
        }
    }

    /// Iterate declarations in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
