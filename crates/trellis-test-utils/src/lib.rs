//! Test utilities for trellis.
//!
//! [`Markup`] builds a [`Document`] from nested closures and remembers named
//! elements, so tests can refer to "trigger" or "dialog" instead of raw ids.
//! The `*_fixture` functions build the canonical markup of each widget.
//!
//! ```
//! use trellis_test_utils::Markup;
//!
//! let fixture = Markup::new()
//!     .body(|body| {
//!         body.child("div", |root| {
//!             root.name("root").controller("dropdown");
//!             root.child("button", |b| {
//!                 b.name("trigger").target("dropdown", "trigger");
//!             });
//!         });
//!     })
//!     .build();
//!
//! let root = fixture.id("root");
//! assert_eq!(fixture.doc.parent(fixture.id("trigger")), Some(root));
//! ```

mod fixtures;

pub use fixtures::{
    dropdown_fixture, modal_fixture, nested_modals_fixture, password_fixture, remote_modal_fixture,
    toast_fixture,
};

use indexmap::IndexMap;
use trellis_dom::{Document, ElementId, PageMetrics};

/// A built document plus the elements named while building it.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub doc: Document,
    named: IndexMap<String, ElementId>,
}

impl Fixture {
    /// The element registered as `name`.
    ///
    /// # Panics
    ///
    /// Panics if no element was given that name.
    pub fn id(&self, name: &str) -> ElementId {
        match self.named.get(name) {
            Some(id) => *id,
            None => panic!("fixture has no element named {name:?}"),
        }
    }

    pub fn get(&self, name: &str) -> Option<ElementId> {
        self.named.get(name).copied()
    }

    /// Named elements whose name starts with `prefix`, in creation order.
    pub fn all(&self, prefix: &str) -> Vec<ElementId> {
        self.named
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(_, id)| *id)
            .collect()
    }
}

/// Declarative document builder.
#[derive(Debug, Default)]
pub struct Markup {
    doc: Document,
    named: IndexMap<String, ElementId>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(mut self, metrics: PageMetrics) -> Self {
        self.doc.set_metrics(metrics);
        self
    }

    /// Build children of `<body>`.
    pub fn body(mut self, f: impl FnOnce(&mut Node<'_>)) -> Self {
        let body = self.doc.body();
        let mut node = Node { markup: &mut self, id: body };
        f(&mut node);
        self
    }

    pub fn build(self) -> Fixture {
        Fixture {
            doc: self.doc,
            named: self.named,
        }
    }
}

/// An element under construction.
pub struct Node<'a> {
    markup: &'a mut Markup,
    id: ElementId,
}

impl Node<'_> {
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Append a `tag` child and build it with `f`.
    pub fn child(&mut self, tag: &str, f: impl FnOnce(&mut Node<'_>)) -> &mut Self {
        let id = self.markup.doc.create_element(tag);
        self.markup.doc.append_child(self.id, id);
        let mut node = Node { markup: &mut *self.markup, id };
        f(&mut node);
        self
    }

    /// Append `count` children built by `f`, which receives the index.
    pub fn children(&mut self, tag: &str, count: usize, f: impl Fn(usize, &mut Node<'_>)) -> &mut Self {
        for i in 0..count {
            self.child(tag, |node| f(i, node));
        }
        self
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.markup.named.insert(name.into(), self.id);
        self
    }

    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.markup.doc.set_attribute(self.id, name, value);
        self
    }

    pub fn class(&mut self, classes: &str) -> &mut Self {
        for class in classes.split_whitespace() {
            self.markup.doc.add_class(self.id, class);
        }
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.markup.doc.set_text(self.id, text);
        self
    }

    pub fn controller(&mut self, identifiers: &str) -> &mut Self {
        self.attr("data-controller", identifiers)
    }

    pub fn target(&mut self, identifier: &str, name: &str) -> &mut Self {
        self.attr(&format!("data-{identifier}-target"), name)
    }

    /// `data-<identifier>-<option>-value`; `option` is already kebab-case.
    pub fn option(&mut self, identifier: &str, option: &str, value: &str) -> &mut Self {
        self.attr(&format!("data-{identifier}-{option}-value"), value)
    }

    pub fn action(&mut self, descriptor: &str) -> &mut Self {
        self.attr("data-action", descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_elements() {
        let fixture = Markup::new()
            .body(|body| {
                body.children("button", 3, |i, b| {
                    b.name(format!("button-{i}"));
                });
            })
            .build();
        assert_eq!(fixture.all("button-").len(), 3);
        assert_eq!(fixture.get("missing"), None);
    }

    #[test]
    fn test_attributes_and_classes() {
        let fixture = Markup::new()
            .body(|body| {
                body.child("div", |d| {
                    d.name("d").class("hidden fixed").option("modal", "backdrop-close", "false");
                });
            })
            .build();
        let d = fixture.id("d");
        assert!(fixture.doc.has_class(d, "hidden"));
        assert_eq!(fixture.doc.attribute(d, "data-modal-backdrop-close-value"), Some("false"));
    }
}
