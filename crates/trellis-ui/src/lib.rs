//! Trellis UI - attachable interactive widgets.
//!
//! Widgets bind to markup declaratively and are driven by a [`Page`]:
//!
//! - [`Dropdown`]: menu with keyboard navigation and outside-click dismissal
//! - [`Modal`]: dialog with focus trap, scroll lock and animated close
//! - [`ToastManager`]: transient notifications with auto-expiry
//! - [`PasswordVisibility`]: show/hide toggle for password inputs
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use trellis_core::Config;
//! use trellis_dom::{Document, Key};
//! use trellis_ui::Page;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! let trigger = doc.create_element("button");
//! let menu = doc.create_element("div");
//! let item = doc.create_element("a");
//! doc.append_child(doc.body(), root);
//! doc.append_child(root, trigger);
//! doc.append_child(root, menu);
//! doc.append_child(menu, item);
//! doc.set_attribute(root, "data-controller", "dropdown");
//! doc.set_attribute(trigger, "data-dropdown-target", "trigger");
//! doc.set_attribute(trigger, "data-action", "click->dropdown#toggle");
//! doc.set_attribute(menu, "data-dropdown-target", "menu");
//! doc.set_attribute(item, "href", "/settings");
//! doc.add_class(menu, "hidden");
//!
//! let mut page = Page::new(doc, Config::default());
//! page.connect();
//!
//! page.click(trigger);
//! page.advance(Duration::from_millis(16));
//! assert_eq!(page.document().active_element(), Some(item));
//!
//! page.press(Key::Escape);
//! assert!(!page.dropdown(root).unwrap().is_open());
//! assert_eq!(page.document().active_element(), Some(trigger));
//! ```

pub mod attach;
pub mod controller;
pub mod dropdown;
pub mod focus;
pub mod modal;
pub mod page;
pub mod password_visibility;
pub mod toast;

pub use attach::{Action, ActionParseError, OptionError, OptionReader, Scope};
pub use controller::{Constructor, Context, Controller, Task};
pub use dropdown::{Dropdown, DropdownOptions, DropdownState, Placement};
pub use focus::{FocusDirection, FocusSet};
pub use modal::{Modal, ModalOptions, ModalParts, ModalState};
pub use page::Page;
pub use password_visibility::PasswordVisibility;
pub use toast::{
    Severity, ToastEntry, ToastId, ToastManager, ToastOptions, ToastPosition, ToastRegistry,
    ToastRequest,
};
