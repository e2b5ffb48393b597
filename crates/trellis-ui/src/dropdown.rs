//! Dropdown menu with keyboard navigation and outside-click dismissal.
//!
//! ```text
//! <div data-controller="dropdown">
//!   <button data-dropdown-target="trigger" data-action="click->dropdown#toggle">Menu</button>
//!   <div data-dropdown-target="menu" class="hidden">
//!     <a href="/profile">Profile</a>
//!     <a href="/logout" data-action="click->dropdown#select">Log out</a>
//!   </div>
//! </div>
//! ```
//!
//! Options: `data-dropdown-placement-value` (`bottom-start` by default) and
//! `data-dropdown-close-on-select-value` (`true` by default).
//!
//! Open and close are synchronous. While open the dropdown holds one
//! document click listener and one document key listener; both go away on
//! every path out of the open state.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use trellis_core::profiling::profile_function;
use trellis_dom::{ElementId, Event, Key};
use trellis_runtime::{ListenerKind, TimerHandle};

use crate::attach::{OptionError, Scope};
use crate::controller::{Context, Controller, Task};
use crate::focus::{FocusDirection, FocusSet, MENU_ITEMS};

pub const IDENTIFIER: &str = "dropdown";

const PLACEMENT_CLASSES: [&str; 6] = ["left-0", "right-0", "bottom-full", "top-full", "mb-1", "mt-1"];

/// Where the menu sits relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    BottomStart,
    BottomEnd,
    TopStart,
    TopEnd,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
            Placement::TopStart => "top-start",
            Placement::TopEnd => "top-end",
        }
    }

    /// Anchored to the trigger's right edge.
    pub fn is_end(&self) -> bool {
        matches!(self, Placement::BottomEnd | Placement::TopEnd)
    }

    /// Menu above the trigger.
    pub fn is_top(&self) -> bool {
        matches!(self, Placement::TopStart | Placement::TopEnd)
    }

    /// Positioning classes applied to the menu.
    pub fn classes(&self) -> [&'static str; 3] {
        let horizontal = if self.is_end() { "right-0" } else { "left-0" };
        let [vertical, gap] = if self.is_top() {
            ["bottom-full", "mb-1"]
        } else {
            ["top-full", "mt-1"]
        };
        [horizontal, vertical, gap]
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bottom-start" => Ok(Placement::BottomStart),
            "bottom-end" => Ok(Placement::BottomEnd),
            "top-start" => Ok(Placement::TopStart),
            "top-end" => Ok(Placement::TopEnd),
            other => Err(OptionError::Choice {
                option: "placement".to_string(),
                value: other.to_string(),
                expected: "bottom-start, bottom-end, top-start, top-end",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownOptions {
    pub placement: Placement,
    pub close_on_select: bool,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            placement: Placement::BottomStart,
            close_on_select: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    Open,
}

#[derive(Debug)]
pub struct Dropdown {
    scope: Scope,
    trigger: Option<ElementId>,
    menu: Option<ElementId>,
    options: DropdownOptions,
    state: DropdownState,
    pending_focus: Option<TimerHandle>,
    pending_close: Option<TimerHandle>,
}

impl Dropdown {
    /// Resolve targets and options and set up the ARIA attributes.
    pub fn attach(scope: Scope, cx: &mut Context) -> Self {
        let trigger = scope.target(&cx.doc, "trigger");
        let menu = scope.target(&cx.doc, "menu");
        let reader = scope.options(&cx.doc);
        let options = DropdownOptions {
            placement: reader.coerce("placement", Placement::default(), |_, raw| raw.parse()),
            close_on_select: reader.boolean("closeOnSelect", true),
        };

        if let Some(trigger) = trigger {
            cx.doc.set_attribute(trigger, "aria-expanded", "false");
            cx.doc.set_attribute(trigger, "aria-haspopup", "true");
        }
        if let Some(menu) = menu {
            cx.doc.set_attribute(menu, "role", "menu");
            for item in FocusSet::collect(&cx.doc, menu, "a, button").items() {
                cx.doc.set_attribute(*item, "role", "menuitem");
            }
        }

        tracing::debug!(root = %scope.root, ?options, has_menu = menu.is_some(), "dropdown attached");
        Self {
            scope,
            trigger,
            menu,
            options,
            state: DropdownState::Closed,
            pending_focus: None,
            pending_close: None,
        }
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    pub fn options(&self) -> DropdownOptions {
        self.options
    }

    pub fn trigger(&self) -> Option<ElementId> {
        self.trigger
    }

    pub fn menu(&self) -> Option<ElementId> {
        self.menu
    }

    /// Open if closed, close if open. Consumes the triggering event so the
    /// same click is never seen as an outside click.
    pub fn toggle(&mut self, event: &mut Event, cx: &mut Context) {
        event.prevent_default();
        event.stop_propagation();
        if self.is_open() {
            self.close(cx);
        } else {
            self.open(cx);
        }
    }

    pub fn open(&mut self, cx: &mut Context) {
        let Some(menu) = self.menu else {
            return;
        };
        if self.is_open() {
            return;
        }
        self.state = DropdownState::Open;

        cx.doc.remove_class(menu, "hidden");
        if let Some(trigger) = self.trigger {
            cx.doc.set_attribute(trigger, "aria-expanded", "true");
        }
        self.position(cx);

        let owner = self.scope.owner();
        cx.listeners.install(owner, ListenerKind::Click);
        cx.listeners.install(owner, ListenerKind::KeyDown);
        self.pending_focus = Some(cx.scheduler.request_frame(owner, Task::FocusInitial));

        tracing::debug!(root = %self.scope.root, "dropdown opened");
        cx.emit(&self.scope, "opened");
    }

    pub fn close(&mut self, cx: &mut Context) {
        let Some(menu) = self.menu else {
            return;
        };
        if !self.is_open() {
            return;
        }
        self.state = DropdownState::Closed;

        cx.doc.add_class(menu, "hidden");
        if let Some(trigger) = self.trigger {
            cx.doc.set_attribute(trigger, "aria-expanded", "false");
        }
        self.release(cx);
        if let Some(trigger) = self.trigger {
            cx.doc.focus(trigger);
        }

        tracing::debug!(root = %self.scope.root, "dropdown closed");
        cx.emit(&self.scope, "closed");
    }

    /// Close after an item was chosen, if close-on-select is enabled.
    pub fn select(&mut self, cx: &mut Context) {
        if self.options.close_on_select {
            self.close(cx);
        }
    }

    /// Current menu items, recomputed on every call.
    pub fn items(&self, cx: &Context) -> FocusSet {
        self.menu
            .map(|menu| FocusSet::collect(&cx.doc, menu, MENU_ITEMS))
            .unwrap_or_default()
    }

    fn position(&self, cx: &mut Context) {
        let Some(menu) = self.menu else {
            return;
        };
        for class in PLACEMENT_CLASSES {
            cx.doc.remove_class(menu, class);
        }
        for class in self.options.placement.classes() {
            cx.doc.add_class(menu, class);
        }
    }

    /// Drop listeners and pending callbacks tied to the open state.
    fn release(&mut self, cx: &mut Context) {
        let owner = self.scope.owner();
        cx.listeners.uninstall(owner, &ListenerKind::Click);
        cx.listeners.uninstall(owner, &ListenerKind::KeyDown);
        for handle in [self.pending_focus.take(), self.pending_close.take()].into_iter().flatten() {
            cx.scheduler.cancel(handle);
        }
    }
}

impl Controller for Dropdown {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn invoke(&mut self, method: &str, event: &mut Event, cx: &mut Context) -> bool {
        match method {
            "toggle" => self.toggle(event, cx),
            "open" => self.open(cx),
            "close" => self.close(cx),
            "select" => self.select(cx),
            _ => return false,
        }
        true
    }

    fn document_click(&mut self, event: &mut Event, cx: &mut Context) {
        if !cx.doc.contains(self.scope.root, event.target) {
            tracing::trace!(root = %self.scope.root, target = %event.target, "outside click");
            self.close(cx);
        }
    }

    fn document_key(&mut self, event: &mut Event, cx: &mut Context) {
        profile_function!();
        let Some(key) = event.key() else {
            return;
        };
        match key {
            Key::Escape => {
                event.prevent_default();
                self.close(cx);
            }
            Key::ArrowDown => {
                event.prevent_default();
                self.items(cx).move_focus(&mut cx.doc, FocusDirection::Next);
            }
            Key::ArrowUp => {
                event.prevent_default();
                self.items(cx).move_focus(&mut cx.doc, FocusDirection::Previous);
            }
            Key::Tab => self.close(cx),
            Key::Enter | Key::Space => {
                // the item's own activation runs first; close a frame later
                if self.options.close_on_select && self.pending_close.is_none() {
                    let handle = cx.scheduler.request_frame(self.scope.owner(), Task::DeferredClose);
                    self.pending_close = Some(handle);
                }
            }
            _ => {}
        }
    }

    fn timer(&mut self, handle: TimerHandle, task: Task, cx: &mut Context) {
        match task {
            Task::FocusInitial if self.pending_focus == Some(handle) => {
                self.pending_focus = None;
                self.items(cx).focus_first(&mut cx.doc);
            }
            Task::DeferredClose if self.pending_close == Some(handle) => {
                self.pending_close = None;
                self.close(cx);
            }
            _ => tracing::trace!(?task, "stale dropdown task ignored"),
        }
    }

    fn disconnect(&mut self, cx: &mut Context) {
        self.release(cx);
        self.state = DropdownState::Closed;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn construct(scope: Scope, cx: &mut Context) -> Box<dyn Controller> {
    Box::new(Dropdown::attach(scope, cx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Config;
    use trellis_dom::Document;
    use trellis_runtime::WidgetKey;

    fn setup(placement: Option<&str>) -> (Context, Dropdown) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let trigger = doc.create_element("button");
        let menu = doc.create_element("div");
        doc.append_child(doc.body(), root);
        doc.append_child(root, trigger);
        doc.append_child(root, menu);
        doc.set_attribute(trigger, "data-dropdown-target", "trigger");
        doc.set_attribute(menu, "data-dropdown-target", "menu");
        doc.add_class(menu, "hidden");
        if let Some(placement) = placement {
            doc.set_attribute(root, "data-dropdown-placement-value", placement);
        }
        for _ in 0..2 {
            let item = doc.create_element("a");
            doc.set_attribute(item, "href", "#");
            doc.append_child(menu, item);
        }
        let mut cx = Context::new(doc, Config::default());
        let dropdown = Dropdown::attach(Scope::new(WidgetKey(1), root, IDENTIFIER), &mut cx);
        (cx, dropdown)
    }

    #[test]
    fn test_placement_classes() {
        assert_eq!(Placement::BottomStart.classes(), ["left-0", "top-full", "mt-1"]);
        assert_eq!(Placement::TopEnd.classes(), ["right-0", "bottom-full", "mb-1"]);
        assert!("sideways".parse::<Placement>().is_err());
    }

    #[test]
    fn test_aria_setup() {
        let (cx, dropdown) = setup(None);
        let trigger = dropdown.trigger().unwrap();
        let menu = dropdown.menu().unwrap();
        assert_eq!(cx.doc.attribute(trigger, "aria-expanded"), Some("false"));
        assert_eq!(cx.doc.attribute(trigger, "aria-haspopup"), Some("true"));
        assert_eq!(cx.doc.attribute(menu, "role"), Some("menu"));
        for item in cx.doc.children(menu) {
            assert_eq!(cx.doc.attribute(*item, "role"), Some("menuitem"));
        }
    }

    #[test]
    fn test_open_and_close() {
        let (mut cx, mut dropdown) = setup(Some("top-end"));
        let menu = dropdown.menu().unwrap();
        dropdown.open(&mut cx);

        assert!(dropdown.is_open());
        assert!(!cx.doc.has_class(menu, "hidden"));
        assert!(cx.doc.has_class(menu, "right-0"));
        assert!(cx.doc.has_class(menu, "bottom-full"));
        assert_eq!(cx.listeners.count_for(dropdown.scope().owner()), 2);

        dropdown.close(&mut cx);
        assert!(cx.doc.has_class(menu, "hidden"));
        assert_eq!(cx.listeners.count_for(dropdown.scope().owner()), 0);
        assert_eq!(cx.scheduler.pending(), 0);
        assert_eq!(cx.doc.active_element(), dropdown.trigger());

        let names: Vec<_> = cx.notifications.drain().into_iter().map(|n| n.name).collect();
        assert_eq!(names, ["dropdown:opened", "dropdown:closed"]);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let (mut cx, mut dropdown) = setup(None);
        dropdown.close(&mut cx);
        assert!(cx.notifications.drain().is_empty());
    }

    #[test]
    fn test_invalid_placement_falls_back() {
        let (_, dropdown) = setup(Some("diagonal"));
        assert_eq!(dropdown.options().placement, Placement::BottomStart);
    }

    #[test]
    fn test_missing_menu_is_noop() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root);
        let mut cx = Context::new(doc, Config::default());
        let mut dropdown = Dropdown::attach(Scope::new(WidgetKey(1), root, IDENTIFIER), &mut cx);

        dropdown.open(&mut cx);
        assert!(!dropdown.is_open());
        assert!(cx.listeners.is_empty());
        assert!(cx.notifications.drain().is_empty());
    }
}
