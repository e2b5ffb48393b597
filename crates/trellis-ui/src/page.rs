//! The page host: attaches controllers and routes input, timers and
//! notifications to them.
//!
//! # Dispatch order
//!
//! For a click or key press:
//!
//! 1. Toast dismiss affordances (`data-toast-dismiss`) under the target.
//! 2. `data-action` descriptors, bubbling from the target to the document
//!    root. Each descriptor runs on the nearest enclosing controller with its
//!    identifier. Bubbling stops after an element whose handler stopped
//!    propagation.
//! 3. Document-level listeners, unless propagation was stopped.
//! 4. The default action, unless it was prevented: Tab moves focus
//!    sequentially, Enter and Space activate the focused element.
//!
//! # Example
//!
//! ```
//! use trellis_core::Config;
//! use trellis_dom::Document;
//! use trellis_ui::Page;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! doc.append_child(doc.body(), root);
//! doc.set_attribute(root, "data-controller", "toast");
//!
//! let mut page = Page::new(doc, Config::default());
//! assert_eq!(page.connect(), 1);
//! assert!(page.toast_manager(root).is_some());
//! ```

use std::time::Duration;

use indexmap::IndexMap;
use trellis_core::Config;
use trellis_core::alloc::HashMap;
use trellis_core::profiling::{self, profile_function};
use trellis_dom::{Document, ElementId, Event, EventKind, Key, KeyboardEvent, Modifiers};
use trellis_runtime::{
    Fired, ListenerKind, ListenerRegistry, Notification, Owner, Scheduler, ScrollLock, WidgetKey,
};

use crate::attach::{Scope, controllers_of, parse_actions};
use crate::controller::{Constructor, Context, Controller, Task};
use crate::dropdown::{self, Dropdown};
use crate::modal::{self, Modal};
use crate::password_visibility::{self, PasswordVisibility};
use crate::toast::{self, SHOW_EVENT, ToastManager, ToastRegistry, ToastRequest};

struct Attached {
    root: ElementId,
    identifier: String,
    controller: Box<dyn Controller>,
}

pub struct Page {
    cx: Context,
    constructors: IndexMap<String, Constructor>,
    controllers: IndexMap<WidgetKey, Attached>,
    index: HashMap<(ElementId, String), WidgetKey>,
    next_key: u64,
}

impl Page {
    /// A page with the built-in controllers registered. Nothing is attached
    /// until [`Page::connect`] or [`Page::attach`] is called.
    pub fn new(doc: Document, config: Config) -> Self {
        let mut page = Self {
            cx: Context::new(doc, config),
            constructors: IndexMap::new(),
            controllers: IndexMap::new(),
            index: HashMap::default(),
            next_key: 0,
        };
        page.register(dropdown::IDENTIFIER, dropdown::construct);
        page.register(modal::IDENTIFIER, modal::construct);
        page.register(toast::IDENTIFIER, toast::construct);
        page.register(password_visibility::IDENTIFIER, password_visibility::construct);
        page
    }

    /// Register (or replace) the constructor for `identifier`.
    pub fn register(&mut self, identifier: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(identifier.into(), constructor);
    }

    // --- lifecycle ---

    /// Attach every identifier listed in a `data-controller` attribute.
    /// Returns how many new controllers were attached.
    pub fn connect(&mut self) -> usize {
        let doc = &self.cx.doc;
        let root = doc.document_element();
        let pending: Vec<(ElementId, String)> = std::iter::once(root)
            .chain(doc.descendants(root))
            .flat_map(|el| {
                controllers_of(doc, el)
                    .into_iter()
                    .map(move |identifier| (el, identifier.to_string()))
            })
            .collect();

        let mut attached = 0;
        for (el, identifier) in pending {
            if self.key_of(el, &identifier).is_none() && self.attach(el, &identifier).is_some() {
                attached += 1;
            }
        }
        tracing::debug!(attached, total = self.controllers.len(), "page connected");
        attached
    }

    /// Attach `identifier` to `root`. Attaching twice returns the existing key.
    pub fn attach(&mut self, root: ElementId, identifier: &str) -> Option<WidgetKey> {
        if let Some(key) = self.key_of(root, identifier) {
            return Some(key);
        }
        if self.cx.doc.get(root).is_none() {
            tracing::warn!(%root, identifier, "cannot attach to unknown element");
            return None;
        }
        let Some(constructor) = self.constructors.get(identifier).copied() else {
            tracing::debug!(%root, identifier, "no controller registered, skipping");
            return None;
        };

        self.next_key += 1;
        let key = WidgetKey(self.next_key);
        let controller = constructor(Scope::new(key, root, identifier), &mut self.cx);
        self.controllers.insert(
            key,
            Attached {
                root,
                identifier: identifier.to_string(),
                controller,
            },
        );
        self.index.insert((root, identifier.to_string()), key);
        tracing::debug!(%key, %root, identifier, "controller attached");
        Some(key)
    }

    /// Detach `identifier` from `root`, releasing every timer and listener
    /// it owns. Returns false if nothing was attached.
    pub fn detach(&mut self, root: ElementId, identifier: &str) -> bool {
        let Some(key) = self.index.remove(&(root, identifier.to_string())) else {
            return false;
        };
        let Some(mut attached) = self.controllers.shift_remove(&key) else {
            return false;
        };
        attached.controller.disconnect(&mut self.cx);

        let owner = Owner::Widget(key);
        let timers = self.cx.scheduler.cancel_owned(owner);
        let listeners = self.cx.listeners.remove_owned(owner);
        tracing::debug!(%key, %root, identifier, timers, listeners, "controller detached");
        true
    }

    pub fn detach_all(&mut self) {
        let attached: Vec<(ElementId, String)> = self
            .controllers
            .values()
            .map(|a| (a.root, a.identifier.clone()))
            .collect();
        for (root, identifier) in attached {
            self.detach(root, &identifier);
        }
    }

    // --- input ---

    /// Click `target`: focus it when focusable, then dispatch.
    pub fn click(&mut self, target: ElementId) -> Event {
        profile_function!();
        if self.cx.doc.is_focusable(target) {
            self.cx.doc.focus(target);
        }
        let mut event = Event::click(target);
        self.dismiss_toast(target);
        self.dispatch_actions(&mut event);
        if !event.propagation_stopped() {
            self.dispatch_document(&mut event, ListenerKind::Click);
        }
        event
    }

    /// Press `key` on the focused element (the body when nothing is focused).
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> Event {
        profile_function!();
        let target = self.cx.doc.active_element().unwrap_or(self.cx.doc.body());
        let keyboard = KeyboardEvent::with_modifiers(key, modifiers);
        let mut event = Event::key_down(target, keyboard);
        self.dispatch_actions(&mut event);
        if !event.propagation_stopped() {
            self.dispatch_document(&mut event, ListenerKind::KeyDown);
        }
        if !event.default_prevented() {
            self.default_key_action(keyboard);
        }
        event
    }

    /// Shorthand for [`Page::key_down`] without modifiers.
    pub fn press(&mut self, key: Key) -> Event {
        self.key_down(key, Modifiers::empty())
    }

    /// Raise the global "show toast" notification.
    pub fn notify(&mut self, request: ToastRequest) {
        let kind = ListenerKind::Notification(SHOW_EVENT.to_string());
        for owner in self.cx.listeners.listeners_for(&kind) {
            if let Owner::Widget(key) = owner
                && self.cx.listeners.is_installed(owner, &kind)
                && let Some(attached) = self.controllers.get_mut(&key)
            {
                attached.controller.toast_request(&request, &mut self.cx);
            }
        }
    }

    /// Move the clock forward by `dt`, running everything that comes due.
    pub fn advance(&mut self, dt: Duration) {
        profile_function!();
        profiling::new_frame();
        let until = self.cx.scheduler.now().saturating_add(dt);
        while let Some(fired) = self.cx.scheduler.pop_due(until) {
            self.deliver(fired);
        }
        self.cx.scheduler.settle(until);
    }

    fn deliver(&mut self, fired: Fired<Task>) {
        match fired.owner {
            Owner::Toasts => {
                let cx = &mut self.cx;
                cx.toasts
                    .fire(fired.handle, fired.task, &mut cx.doc, &mut cx.scheduler, &cx.config);
            }
            Owner::Widget(key) => match self.controllers.get_mut(&key) {
                Some(attached) => attached.controller.timer(fired.handle, fired.task, &mut self.cx),
                None => tracing::trace!(%key, task = ?fired.task, "dropping task of detached controller"),
            },
        }
    }

    fn dismiss_toast(&mut self, target: ElementId) {
        let cx = &mut self.cx;
        if let Some(id) = cx.toasts.dismiss_target(&cx.doc, target) {
            cx.toasts.remove(id, &mut cx.doc, &mut cx.scheduler, &cx.config);
        }
    }

    fn dispatch_actions(&mut self, event: &mut Event) {
        let kind = event.kind;
        let path: Vec<ElementId> = std::iter::once(event.target)
            .chain(self.cx.doc.ancestors(event.target))
            .collect();
        for el in path {
            let Some(value) = self.cx.doc.attribute(el, "data-action") else {
                continue;
            };
            let actions = parse_actions(value);
            for action in actions.iter().filter(|a| a.event == kind) {
                let Some(key) = self.nearest_controller(el, &action.identifier) else {
                    tracing::trace!(%el, identifier = %action.identifier, "no controller for action");
                    continue;
                };
                let Some(attached) = self.controllers.get_mut(&key) else {
                    continue;
                };
                event.current_target = Some(el);
                tracing::trace!(%el, event = kind.as_str(), method = %action.method, "action");
                if !attached.controller.invoke(&action.method, event, &mut self.cx) {
                    tracing::warn!(identifier = %action.identifier, method = %action.method, "unknown action method");
                }
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event.current_target = None;
    }

    fn dispatch_document(&mut self, event: &mut Event, kind: ListenerKind) {
        for owner in self.cx.listeners.listeners_for(&kind) {
            let Owner::Widget(key) = owner else {
                continue;
            };
            // an earlier listener may have closed or detached this one
            if !self.cx.listeners.is_installed(owner, &kind) {
                continue;
            }
            let Some(attached) = self.controllers.get_mut(&key) else {
                continue;
            };
            match event.kind {
                EventKind::Click => attached.controller.document_click(event, &mut self.cx),
                EventKind::KeyDown => attached.controller.document_key(event, &mut self.cx),
            }
        }
    }

    fn default_key_action(&mut self, keyboard: KeyboardEvent) {
        match keyboard.key {
            Key::Tab => {
                self.cx.doc.focus_sequential(!keyboard.shift());
            }
            Key::Enter | Key::Space => {
                if let Some(active) = self.cx.doc.active_element() {
                    self.click(active);
                }
            }
            _ => {}
        }
    }

    /// The controller for `identifier` on `el` or its nearest ancestor.
    fn nearest_controller(&self, el: ElementId, identifier: &str) -> Option<WidgetKey> {
        std::iter::once(el)
            .chain(self.cx.doc.ancestors(el))
            .find_map(|candidate| self.key_of(candidate, identifier))
    }

    fn key_of(&self, root: ElementId, identifier: &str) -> Option<WidgetKey> {
        self.index.get(&(root, identifier.to_string())).copied()
    }

    // --- introspection ---

    pub fn controller<C: Controller>(&self, root: ElementId, identifier: &str) -> Option<&C> {
        let key = self.key_of(root, identifier)?;
        self.controllers.get(&key)?.controller.as_any().downcast_ref()
    }

    /// Run `f` with a typed controller and the page context.
    pub fn with_controller<C: Controller, R>(
        &mut self,
        root: ElementId,
        identifier: &str,
        f: impl FnOnce(&mut C, &mut Context) -> R,
    ) -> Option<R> {
        let key = self.key_of(root, identifier)?;
        let attached = self.controllers.get_mut(&key)?;
        let controller = attached.controller.as_any_mut().downcast_mut::<C>()?;
        Some(f(controller, &mut self.cx))
    }

    pub fn dropdown(&self, root: ElementId) -> Option<&Dropdown> {
        self.controller(root, dropdown::IDENTIFIER)
    }

    pub fn modal(&self, root: ElementId) -> Option<&Modal> {
        self.controller(root, modal::IDENTIFIER)
    }

    pub fn toast_manager(&self, root: ElementId) -> Option<&ToastManager> {
        self.controller(root, toast::IDENTIFIER)
    }

    pub fn password_visibility(&self, root: ElementId) -> Option<&PasswordVisibility> {
        self.controller(root, password_visibility::IDENTIFIER)
    }

    pub fn is_attached(&self, root: ElementId, identifier: &str) -> bool {
        self.key_of(root, identifier).is_some()
    }

    /// Number of attached controllers.
    pub fn attached(&self) -> usize {
        self.controllers.len()
    }

    pub fn document(&self) -> &Document {
        &self.cx.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.cx.doc
    }

    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.cx
    }

    pub fn config(&self) -> &Config {
        &self.cx.config
    }

    pub fn toasts(&self) -> &ToastRegistry {
        &self.cx.toasts
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.cx.listeners
    }

    pub fn scheduler(&self) -> &Scheduler<Task> {
        &self.cx.scheduler
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.cx.scroll_lock
    }

    pub fn now(&self) -> Duration {
        self.cx.scheduler.now()
    }

    /// Notifications emitted since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.cx.notifications.drain()
    }

    /// How many times `name` was emitted since the page was created.
    pub fn notification_count(&self, name: &str) -> usize {
        self.cx.notifications.count(name)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("attached", &self.controllers.len())
            .field("now", &self.cx.scheduler.now())
            .field("pending_timers", &self.cx.scheduler.pending())
            .field("listeners", &self.cx.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(identifiers: &str) -> (Page, ElementId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root);
        doc.set_attribute(root, "data-controller", identifiers);
        (Page::new(doc, Config::default()), root)
    }

    #[test]
    fn test_connect_skips_unknown() {
        let (mut page, root) = page_with("toast carousel");
        assert_eq!(page.connect(), 1);
        assert!(page.is_attached(root, "toast"));
        assert!(!page.is_attached(root, "carousel"));
        assert_eq!(page.connect(), 0);
    }

    #[test]
    fn test_attach_twice_returns_existing() {
        let (mut page, root) = page_with("");
        let first = page.attach(root, "modal");
        assert!(first.is_some());
        assert_eq!(page.attach(root, "modal"), first);
        assert_eq!(page.attached(), 1);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let (mut page, root) = page_with("toast");
        page.connect();
        assert_eq!(page.listeners().len(), 1);
        assert!(page.detach(root, "toast"));
        assert!(!page.detach(root, "toast"));
        assert!(page.listeners().is_empty());
    }

    #[test]
    fn test_tab_default_action() {
        let mut doc = Document::new();
        let a = doc.create_element("button");
        let b = doc.create_element("button");
        doc.append_child(doc.body(), a);
        doc.append_child(doc.body(), b);
        let mut page = Page::new(doc, Config::default());

        page.press(Key::Tab);
        assert_eq!(page.document().active_element(), Some(a));
        page.press(Key::Tab);
        assert_eq!(page.document().active_element(), Some(b));
        page.key_down(Key::Tab, Modifiers::SHIFT);
        assert_eq!(page.document().active_element(), Some(a));
    }

    #[test]
    fn test_custom_controller() {
        use crate::attach::Scope;
        use std::any::Any;

        #[derive(Debug)]
        struct Counter {
            scope: Scope,
            clicks: usize,
        }

        impl Controller for Counter {
            fn scope(&self) -> &Scope {
                &self.scope
            }

            fn invoke(&mut self, method: &str, _event: &mut Event, _cx: &mut Context) -> bool {
                if method == "increment" {
                    self.clicks += 1;
                    return true;
                }
                false
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        fn construct(scope: Scope, _cx: &mut Context) -> Box<dyn Controller> {
            Box::new(Counter { scope, clicks: 0 })
        }

        let (mut page, root) = page_with("counter");
        let doc = page.document_mut();
        let button = doc.create_element("button");
        doc.append_child(root, button);
        doc.set_attribute(button, "data-action", "click->counter#increment");

        page.register("counter", construct);
        page.connect();
        page.click(button);
        page.press(Key::Enter);

        let counter: &Counter = page.controller(root, "counter").unwrap();
        assert_eq!(counter.clicks, 2);
    }
}
