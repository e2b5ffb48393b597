//! Elements stored in the document arena.

use indexmap::IndexMap;
use std::fmt;

/// Handle to an element in a [`Document`](crate::Document).
///
/// Handles stay valid after the element is removed from the tree; the element
/// is simply no longer connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single element: tag, attributes, class list, literal text and links.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) classes: Vec<String>,
    pub(crate) text: Option<String>,
    pub(crate) style: IndexMap<String, String>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
}

impl Element {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            classes: Vec::new(),
            text: None,
            style: IndexMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Literal text content. Never parsed as markup.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// The `tabindex` attribute parsed as an integer, if present and valid.
    pub fn tab_index(&self) -> Option<i32> {
        self.attribute("tabindex").and_then(|v| v.trim().parse().ok())
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
    }

    /// Whether the element can take focus from script.
    ///
    /// Form controls that are not disabled, links with an `href`, and anything
    /// carrying a `tabindex` (including `-1`).
    pub fn is_focusable(&self) -> bool {
        if self.has_attribute("tabindex") {
            return self.tab_index().is_some() && !self.is_disabled();
        }
        match self.tag.as_str() {
            "button" | "input" | "select" | "textarea" => !self.is_disabled(),
            "a" => self.has_attribute("href"),
            _ => false,
        }
    }

    /// Whether the element takes part in sequential (Tab) navigation.
    pub fn is_tabbable(&self) -> bool {
        self.is_focusable() && self.tab_index().is_none_or(|i| i >= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_attrs(tag: &str, attrs: &[(&str, &str)]) -> Element {
        let mut el = Element::new(tag);
        for (k, v) in attrs {
            el.attributes.insert(k.to_string(), v.to_string());
        }
        el
    }

    #[test]
    fn test_focusable_controls() {
        assert!(with_attrs("button", &[]).is_focusable());
        assert!(!with_attrs("button", &[("disabled", "")]).is_focusable());
        assert!(with_attrs("input", &[]).is_focusable());
        assert!(with_attrs("textarea", &[]).is_focusable());
        assert!(!with_attrs("div", &[]).is_focusable());
    }

    #[test]
    fn test_links_need_href() {
        assert!(!with_attrs("a", &[]).is_focusable());
        assert!(with_attrs("a", &[("href", "#")]).is_focusable());
    }

    #[test]
    fn test_tabindex() {
        let div = with_attrs("div", &[("tabindex", "0")]);
        assert!(div.is_focusable());
        assert!(div.is_tabbable());

        let div = with_attrs("div", &[("tabindex", "-1")]);
        assert!(div.is_focusable());
        assert!(!div.is_tabbable());

        let div = with_attrs("div", &[("tabindex", "nope")]);
        assert!(!div.is_focusable());
    }

    #[test]
    fn test_tag_is_lowercased() {
        assert_eq!(Element::new("BUTTON").tag(), "button");
    }
}
