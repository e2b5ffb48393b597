//! Trellis DOM - a headless, deterministic document model.
//!
//! Widgets in `trellis-ui` never talk to a browser. They operate on this
//! model instead: an element arena with attributes, classes, literal text,
//! keyboard focus, a small selector engine and page metrics.
//!
//! ```
//! use trellis_dom::Document;
//!
//! let mut doc = Document::new();
//! let button = doc.create_element("button");
//! doc.append_child(doc.body(), button);
//!
//! assert!(doc.focus(button));
//! assert_eq!(doc.active_element(), Some(button));
//! ```

pub mod document;
pub mod element;
pub mod event;
pub mod selector;

pub use document::{Document, FocusChange, PageMetrics};
pub use element::{Element, ElementId};
pub use event::{Event, EventFlags, EventKind, Key, KeyboardEvent, Modifiers};
pub use selector::{Selector, SelectorError};
