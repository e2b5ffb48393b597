//! Trellis - declarative interactive widgets
//!
//! Markup declares which widget drives which subtree through
//! `data-controller`, `data-<identifier>-target`, `data-<identifier>-<option>-value`
//! and `data-action` attributes. A [`Page`] attaches the widgets, routes input
//! to them and advances a virtual clock for their timers.
//!
//! - **Dropdown**: keyboard navigable menu with outside-click dismissal
//! - **Modal**: dialog with focus trap, scroll lock and animated close
//! - **Toast**: transient notifications with auto-expiry
//! - **PasswordVisibility**: show/hide toggle for password inputs
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use trellis::prelude::*;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! doc.append_child(doc.body(), root);
//! doc.set_attribute(root, "data-controller", "toast");
//!
//! let mut page = PageBuilder::new(doc).build();
//! page.notify(ToastRequest::new("Saved").kind("success"));
//! assert_eq!(page.toasts().len(), 1);
//!
//! page.advance(Duration::from_secs(6));
//! assert!(page.toasts().is_empty());
//! ```

pub mod builder;

pub use trellis_core as core;
pub use trellis_dom as dom;
pub use trellis_runtime as runtime;
pub use trellis_ui as ui;

pub use builder::PageBuilder;
pub use trellis_core::Config;
pub use trellis_ui::Page;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::builder::PageBuilder;
    pub use trellis_core::Config;

    pub use trellis_dom::{Document, ElementId, Event, EventKind, Key, Modifiers, PageMetrics};

    pub use trellis_runtime::{Detail, Notification};

    pub use trellis_ui::{
        Context, Controller, Dropdown, Modal, ModalState, Page, PasswordVisibility, Scope,
        Severity, ToastManager, ToastRequest,
    };
}
