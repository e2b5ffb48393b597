//! The document: element arena, tree structure, focus and page metrics.

use indexmap::IndexMap;

use crate::element::{Element, ElementId};
use crate::selector::{Selector, SelectorError};

/// A change of the focused element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub from: Option<ElementId>,
    pub to: Option<ElementId>,
}

/// Window measurements needed for scroll-lock compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    /// Width of the window including a vertical scrollbar.
    pub viewport_width: u32,
    /// Width of the document element excluding the scrollbar.
    pub client_width: u32,
}

impl PageMetrics {
    pub fn scrollbar_width(&self) -> u32 {
        self.viewport_width.saturating_sub(self.client_width)
    }
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            client_width: 1265,
        }
    }
}

/// A headless document.
///
/// Starts out as `<html><body></body></html>`. Elements are created detached
/// and attached with [`Document::append_child`].
#[derive(Debug, Clone)]
pub struct Document {
    elements: IndexMap<ElementId, Element>,
    next_id: u32,
    root: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    focus_events: Vec<FocusChange>,
    metrics: PageMetrics,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            elements: IndexMap::new(),
            next_id: 0,
            root: ElementId(0),
            body: ElementId(0),
            active: None,
            focus_events: Vec::new(),
            metrics: PageMetrics::default(),
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn with_metrics(mut self, metrics: PageMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn document_element(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn metrics(&self) -> PageMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: PageMetrics) {
        self.metrics = metrics;
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::new(tag));
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Number of elements ever created, connected or not.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // --- tree structure ---

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent. Returns false if either handle is unknown or the move
    /// would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if parent == child
            || !self.elements.contains_key(&parent)
            || !self.elements.contains_key(&child)
            || self.contains(child, parent)
        {
            return false;
        }
        self.unlink(child);
        if let Some(el) = self.elements.get_mut(&child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.elements.get_mut(&parent) {
            el.children.push(child);
        }
        true
    }

    /// Detach an element (and its subtree) from its parent.
    ///
    /// Returns false if the element had no parent. If focus was inside the
    /// removed subtree it is cleared.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.parent(id).is_none() {
            return false;
        }
        let focus_inside = self.active.is_some_and(|active| self.contains(id, active));
        self.unlink(id);
        if focus_inside {
            self.blur();
        }
        true
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(el) = self.elements.get_mut(&parent) {
            el.children.retain(|c| *c != id);
        }
        if let Some(el) = self.elements.get_mut(&id) {
            el.parent = None;
        }
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|el| el.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first, not including `id` itself.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Descendants of `id` in tree order, not including `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Inclusive containment: an element contains itself.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        if ancestor == node {
            return self.elements.contains_key(&node);
        }
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Whether the element is attached to the document tree.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.contains(self.root, id)
    }

    /// Whether the element or one of its ancestors carries the `hidden` class.
    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.has_class(id, "hidden") || self.ancestors(id).into_iter().any(|a| self.has_class(a, "hidden"))
    }

    // --- attributes, classes, text, style ---

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.attribute(name))
    }

    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_attribute(name))
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.attributes.shift_remove(name);
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.elements.get_mut(&id)
            && !el.has_class(class)
        {
            el.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Replace the whole class list with the whitespace-separated `classes`.
    pub fn set_class_name(&mut self, id: ElementId, classes: &str) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.classes.clear();
            for class in classes.split_whitespace() {
                if !el.classes.iter().any(|c| c == class) {
                    el.classes.push(class.to_string());
                }
            }
        }
    }

    pub fn class_name(&self, id: ElementId) -> String {
        self.get(id).map(|el| el.classes.join(" ")).unwrap_or_default()
    }

    /// Store literal text. The text is never interpreted as markup.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.text = Some(text.into());
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).and_then(|el| el.text())
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.style(property))
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.style.insert(property.to_string(), value.into());
        }
    }

    pub fn remove_style(&mut self, id: ElementId, property: &str) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.style.shift_remove(property);
        }
    }

    // --- lookup ---

    /// First connected element whose `id` attribute equals `value`.
    pub fn get_element_by_id(&self, value: &str) -> Option<ElementId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|id| self.attribute(*id, "id") == Some(value))
    }

    /// Elements under `scope` (exclusive) matching `selector`, in tree order.
    pub fn select_all(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    pub fn select_first(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|el| selector.matches(el)))
    }

    /// Like `querySelector`: searches below `scope`.
    pub fn query_selector(
        &self,
        scope: ElementId,
        selector: &str,
    ) -> Result<Option<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_first(scope, &selector))
    }

    pub fn query_selector_all(
        &self,
        scope: ElementId,
        selector: &str,
    ) -> Result<Vec<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(scope, &selector))
    }

    /// Document-wide `querySelector`, including the document element itself.
    pub fn query(&self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        if self.get(self.root).is_some_and(|el| selector.matches(el)) {
            return Ok(Some(self.root));
        }
        Ok(self.select_first(self.root, &selector))
    }

    // --- focus ---

    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    pub fn is_focusable(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(Element::is_focusable)
    }

    /// Focus an element. Fails (returning false) for disconnected or
    /// non-focusable elements; focus then stays where it was.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.is_connected(id) || !self.is_focusable(id) {
            return false;
        }
        if self.active == Some(id) {
            return true;
        }
        let from = self.active.replace(id);
        self.focus_events.push(FocusChange { from, to: Some(id) });
        true
    }

    pub fn blur(&mut self) {
        if let Some(from) = self.active.take() {
            self.focus_events.push(FocusChange { from: Some(from), to: None });
        }
    }

    /// Tabbable elements in tree order, skipping hidden subtrees.
    pub fn tabbable_elements(&self, scope: ElementId) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(Element::is_tabbable) && !self.is_hidden(*id))
            .collect()
    }

    /// Default Tab / Shift+Tab behaviour: move to the next or previous
    /// tabbable element in the document, wrapping at either end.
    pub fn focus_sequential(&mut self, forward: bool) -> Option<ElementId> {
        let order = self.tabbable_elements(self.root);
        if order.is_empty() {
            return None;
        }
        let current = self.active.and_then(|a| order.iter().position(|id| *id == a));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
            (None, true) => 0,
            (None, false) => order.len() - 1,
        };
        let target = order[next];
        self.focus(target);
        Some(target)
    }

    /// Pop all pending focus change events.
    pub fn pop_focus_events(&mut self) -> Vec<FocusChange> {
        std::mem::take(&mut self.focus_events)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_buttons(n: usize) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let ids = (0..n)
            .map(|_| {
                let b = doc.create_element("button");
                doc.append_child(doc.body(), b);
                b
            })
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_new_document_shape() {
        let doc = Document::new();
        assert_eq!(doc.parent(doc.body()), Some(doc.document_element()));
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_append_and_remove() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert!(!doc.is_connected(div));

        assert!(doc.append_child(doc.body(), div));
        assert!(doc.is_connected(div));

        assert!(doc.remove(div));
        assert!(!doc.is_connected(div));
        assert!(!doc.remove(div));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(outer, outer));
    }

    #[test]
    fn test_descendants_tree_order() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let a1 = doc.create_element("span");
        let b = doc.create_element("div");
        doc.append_child(doc.body(), a);
        doc.append_child(a, a1);
        doc.append_child(doc.body(), b);

        assert_eq!(doc.descendants(doc.body()), vec![a, a1, b]);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let (doc, ids) = doc_with_buttons(1);
        assert!(doc.contains(ids[0], ids[0]));
        assert!(doc.contains(doc.body(), ids[0]));
        assert!(!doc.contains(ids[0], doc.body()));
    }

    #[test]
    fn test_focus_requires_connected_focusable() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div);
        assert!(!doc.focus(div));

        let detached = doc.create_element("button");
        assert!(!doc.focus(detached));
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_removing_focused_subtree_blurs() {
        let mut doc = Document::new();
        let wrapper = doc.create_element("div");
        let button = doc.create_element("button");
        doc.append_child(doc.body(), wrapper);
        doc.append_child(wrapper, button);
        doc.focus(button);

        doc.remove(wrapper);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_focus_sequential_wraps() {
        let (mut doc, ids) = doc_with_buttons(3);
        assert_eq!(doc.focus_sequential(true), Some(ids[0]));
        doc.focus(ids[2]);
        assert_eq!(doc.focus_sequential(true), Some(ids[0]));
        assert_eq!(doc.focus_sequential(false), Some(ids[2]));
    }

    #[test]
    fn test_focus_sequential_skips_hidden() {
        let (mut doc, ids) = doc_with_buttons(3);
        doc.add_class(ids[1], "hidden");
        doc.focus(ids[0]);
        assert_eq!(doc.focus_sequential(true), Some(ids[2]));
    }

    #[test]
    fn test_focus_events() {
        let (mut doc, ids) = doc_with_buttons(2);
        doc.focus(ids[0]);
        doc.focus(ids[1]);
        doc.blur();
        let events = doc.pop_focus_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], FocusChange { from: Some(ids[0]), to: Some(ids[1]) });
        assert!(doc.pop_focus_events().is_empty());
    }

    #[test]
    fn test_classes() {
        let (mut doc, ids) = doc_with_buttons(1);
        doc.add_class(ids[0], "hidden");
        doc.add_class(ids[0], "hidden");
        assert_eq!(doc.class_name(ids[0]), "hidden");
        doc.set_class_name(ids[0], "a  b a");
        assert_eq!(doc.class_name(ids[0]), "a b");
        doc.remove_class(ids[0], "a");
        assert_eq!(doc.class_name(ids[0]), "b");
    }

    #[test]
    fn test_get_element_by_id_ignores_detached() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "toast-container");
        assert_eq!(doc.get_element_by_id("toast-container"), None);
        doc.append_child(doc.body(), div);
        assert_eq!(doc.get_element_by_id("toast-container"), Some(div));
    }

    #[test]
    fn test_scrollbar_width() {
        let metrics = PageMetrics { viewport_width: 1000, client_width: 985 };
        assert_eq!(metrics.scrollbar_width(), 15);
        let metrics = PageMetrics { viewport_width: 900, client_width: 985 };
        assert_eq!(metrics.scrollbar_width(), 0);
    }
}
