//! Focus navigation within a container.
//!
//! A [`FocusSet`] is an ordered snapshot of the focusable elements inside a
//! container. Widgets recompute it whenever the container becomes active
//! (a menu opening, a dialog opening) rather than caching it, since the
//! content may change between opens.
//!
//! # Example
//!
//! ```
//! use trellis_dom::Document;
//! use trellis_ui::focus::{FocusDirection, FocusSet};
//!
//! let mut doc = Document::new();
//! let menu = doc.create_element("div");
//! doc.append_child(doc.body(), menu);
//! for _ in 0..3 {
//!     let item = doc.create_element("button");
//!     doc.append_child(menu, item);
//! }
//!
//! let items = FocusSet::collect(&doc, menu, "button:not([disabled])");
//! items.focus_first(&mut doc);
//! items.move_focus(&mut doc, FocusDirection::Previous);
//! assert_eq!(doc.active_element(), items.last());
//! ```

use trellis_dom::{Document, ElementId, Selector};

/// Items a dropdown menu navigates between.
pub const MENU_ITEMS: &str = "a:not([disabled]), button:not([disabled])";

/// Elements a dialog's focus trap cycles through.
pub const TRAP_FOCUSABLE: &str = "button:not([disabled]), a[href], input:not([disabled]), \
    select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Focus navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    /// Move focus forward (ArrowDown)
    Next,
    /// Move focus backward (ArrowUp)
    Previous,
}

/// Ordered focusable elements of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusSet {
    items: Vec<ElementId>,
}

impl FocusSet {
    pub fn new(items: Vec<ElementId>) -> Self {
        Self { items }
    }

    /// Collect the descendants of `scope` matching `selector`, in tree order.
    ///
    /// A malformed selector yields an empty set.
    pub fn collect(doc: &Document, scope: ElementId, selector: &str) -> Self {
        match Selector::parse(selector) {
            Ok(selector) => Self::new(doc.select_all(scope, &selector)),
            Err(err) => {
                tracing::warn!(selector, %err, "cannot collect focusable elements");
                Self::default()
            }
        }
    }

    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<ElementId> {
        self.items.first().copied()
    }

    pub fn last(&self) -> Option<ElementId> {
        self.items.last().copied()
    }

    pub fn position(&self, el: ElementId) -> Option<usize> {
        self.items.iter().position(|item| *item == el)
    }

    pub fn contains(&self, el: ElementId) -> bool {
        self.position(el).is_some()
    }

    /// The element after `current`, wrapping past the end.
    ///
    /// When `current` is not in the set the first element is returned.
    pub fn next_after(&self, current: Option<ElementId>) -> Option<ElementId> {
        let index = match current.and_then(|el| self.position(el)) {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.items.get(index).copied()
    }

    /// The element before `current`, wrapping past the start.
    ///
    /// When `current` is not in the set the last element is returned.
    pub fn previous_before(&self, current: Option<ElementId>) -> Option<ElementId> {
        let index = match current.and_then(|el| self.position(el)) {
            Some(i) if i > 0 => i - 1,
            _ => self.items.len().checked_sub(1)?,
        };
        self.items.get(index).copied()
    }

    /// Move document focus one step in `direction` relative to the active
    /// element. Returns the element that received focus.
    pub fn move_focus(&self, doc: &mut Document, direction: FocusDirection) -> Option<ElementId> {
        let current = doc.active_element();
        let target = match direction {
            FocusDirection::Next => self.next_after(current),
            FocusDirection::Previous => self.previous_before(current),
        }?;
        doc.focus(target).then_some(target)
    }

    pub fn focus_first(&self, doc: &mut Document) -> Option<ElementId> {
        let first = self.first()?;
        doc.focus(first).then_some(first)
    }

    pub fn focus_last(&self, doc: &mut Document) -> Option<ElementId> {
        let last = self.last()?;
        doc.focus(last).then_some(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(doc: &mut Document, count: usize) -> (ElementId, Vec<ElementId>) {
        let menu = doc.create_element("div");
        doc.append_child(doc.body(), menu);
        let items = (0..count)
            .map(|_| {
                let item = doc.create_element("a");
                doc.set_attribute(item, "href", "#");
                doc.append_child(menu, item);
                item
            })
            .collect();
        (menu, items)
    }

    #[test]
    fn test_collect_skips_disabled() {
        let mut doc = Document::new();
        let (scope, items) = menu(&mut doc, 3);
        doc.set_attribute(items[1], "disabled", "");
        let set = FocusSet::collect(&doc, scope, MENU_ITEMS);
        assert_eq!(set.items(), &[items[0], items[2]]);
    }

    #[test]
    fn test_wrap_around() {
        let mut doc = Document::new();
        let (scope, items) = menu(&mut doc, 3);
        let set = FocusSet::collect(&doc, scope, MENU_ITEMS);

        assert_eq!(set.next_after(Some(items[2])), Some(items[0]));
        assert_eq!(set.previous_before(Some(items[0])), Some(items[2]));
        assert_eq!(set.next_after(Some(items[0])), Some(items[1]));
        assert_eq!(set.next_after(None), Some(items[0]));
        assert_eq!(set.previous_before(None), Some(items[2]));
    }

    #[test]
    fn test_empty_set() {
        let mut doc = Document::new();
        let set = FocusSet::default();
        assert_eq!(set.next_after(None), None);
        assert_eq!(set.previous_before(None), None);
        assert_eq!(set.move_focus(&mut doc, FocusDirection::Next), None);
    }

    #[test]
    fn test_move_focus() {
        let mut doc = Document::new();
        let (scope, items) = menu(&mut doc, 2);
        let set = FocusSet::collect(&doc, scope, MENU_ITEMS);

        assert_eq!(set.focus_first(&mut doc), Some(items[0]));
        assert_eq!(set.move_focus(&mut doc, FocusDirection::Next), Some(items[1]));
        assert_eq!(set.move_focus(&mut doc, FocusDirection::Next), Some(items[0]));
        assert_eq!(set.focus_last(&mut doc), Some(items[1]));
    }

    #[test]
    fn test_trap_selector() {
        let mut doc = Document::new();
        let dialog = doc.create_element("div");
        doc.append_child(doc.body(), dialog);
        let input = doc.create_element("input");
        let skipped = doc.create_element("div");
        doc.set_attribute(skipped, "tabindex", "-1");
        let custom = doc.create_element("div");
        doc.set_attribute(custom, "tabindex", "0");
        let bare_link = doc.create_element("a");
        for el in [input, skipped, custom, bare_link] {
            doc.append_child(dialog, el);
        }

        let set = FocusSet::collect(&doc, dialog, TRAP_FOCUSABLE);
        assert_eq!(set.items(), &[input, custom]);
    }
}
