//! Modal dialog with a focus trap, scroll lock and animated close.
//!
//! ```text
//! <div data-controller="modal">
//!   <button data-action="click->modal#open">Edit profile</button>
//!   <div data-modal-target="container" class="hidden">
//!     <div data-modal-target="backdrop" data-action="click->modal#closeOnBackdrop"></div>
//!     <div data-modal-target="dialog" role="dialog" aria-modal="true">
//!       <button data-action="click->modal#close">Close</button>
//!     </div>
//!   </div>
//! </div>
//! ```
//!
//! With `data-modal-remote-value="#selector"` the container is looked up in
//! the whole document at open time, so a trigger can drive a dialog rendered
//! elsewhere on the page. The modal never owns that content; it only keeps
//! the ids it resolved for the current open/close cycle.
//!
//! # Lifecycle
//!
//! ```text
//! closed --open--> open --close--> closing --delay--> closed
//!                   ^                |
//!                   +------open------+
//! ```
//!
//! `open` is synchronous; only the initial focus waits for the next frame.
//! The key listener and the scroll lock are held from `open` until the
//! terminal hide. Reopening while closing cancels the hide and keeps both.
//! Detaching while closing performs the hide on the spot.

use std::any::Any;

use trellis_core::profiling::profile_function;
use trellis_dom::{Document, ElementId, Event, Key};
use trellis_runtime::{ListenerKind, TimerHandle};

use crate::attach::{Scope, find_target};
use crate::controller::{Context, Controller, Task};
use crate::focus::{FocusSet, TRAP_FOCUSABLE};

pub const IDENTIFIER: &str = "modal";

const FADE_IN: &str = "animate-fade-in";
const FADE_OUT: &str = "animate-fade-out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    pub backdrop_close: bool,
    pub escape_close: bool,
    /// Document-wide selector for a remote container. Empty means local targets.
    pub remote: String,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            backdrop_close: true,
            escape_close: true,
            remote: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
    /// Exit animation running, terminal hide scheduled.
    Closing,
}

/// The elements one open/close cycle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalParts {
    pub container: ElementId,
    pub backdrop: Option<ElementId>,
    pub dialog: Option<ElementId>,
}

#[derive(Debug)]
pub struct Modal {
    scope: Scope,
    options: ModalOptions,
    state: ModalState,
    parts: Option<ModalParts>,
    restore_focus: Option<ElementId>,
    trap: FocusSet,
    holds_scroll_lock: bool,
    pending_focus: Option<TimerHandle>,
    pending_hide: Option<TimerHandle>,
}

impl Modal {
    pub fn attach(scope: Scope, cx: &mut Context) -> Self {
        let reader = scope.options(&cx.doc);
        let options = ModalOptions {
            backdrop_close: reader.boolean("backdropClose", true),
            escape_close: reader.boolean("escapeClose", true),
            remote: reader.string("remote", ""),
        };
        tracing::debug!(root = %scope.root, ?options, "modal attached");
        Self {
            scope,
            options,
            state: ModalState::Closed,
            parts: None,
            restore_focus: None,
            trap: FocusSet::default(),
            holds_scroll_lock: false,
            pending_focus: None,
            pending_hide: None,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// Open, with the initial focus waiting for the next frame.
    pub fn focus_pending(&self) -> bool {
        self.pending_focus.is_some()
    }

    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    /// The focus trap computed at the last open.
    pub fn trap(&self) -> &FocusSet {
        &self.trap
    }

    pub fn restore_target(&self) -> Option<ElementId> {
        self.restore_focus
    }

    pub fn holds_scroll_lock(&self) -> bool {
        self.holds_scroll_lock
    }

    /// Resolve the container, backdrop and dialog, locally or through the
    /// remote selector.
    pub fn resolve(&self, doc: &Document) -> Option<ModalParts> {
        let (scope, container) = if self.options.remote.is_empty() {
            let container = self.scope.target(doc, "container")?;
            (self.scope.root, container)
        } else {
            let container = match doc.query(&self.options.remote) {
                Ok(found) => found?,
                Err(err) => {
                    tracing::warn!(remote = %self.options.remote, %err, "invalid remote selector");
                    return None;
                }
            };
            (container, container)
        };
        Some(ModalParts {
            container,
            backdrop: find_target(doc, scope, &self.scope.identifier, "backdrop"),
            dialog: find_target(doc, scope, &self.scope.identifier, "dialog"),
        })
    }

    pub fn open(&mut self, event: Option<&mut Event>, cx: &mut Context) {
        if let Some(event) = event {
            event.prevent_default();
        }
        match self.state {
            ModalState::Open => {}
            ModalState::Closing => self.reopen(cx),
            ModalState::Closed => {
                let Some(parts) = self.resolve(&cx.doc) else {
                    tracing::debug!(root = %self.scope.root, "modal has no container, not opening");
                    return;
                };
                self.parts = Some(parts);
                self.restore_focus = cx.doc.active_element();

                cx.doc.remove_class(parts.container, "hidden");
                for el in [parts.backdrop, parts.dialog].into_iter().flatten() {
                    cx.doc.add_class(el, FADE_IN);
                }
                cx.scroll_lock.acquire(&mut cx.doc);
                self.holds_scroll_lock = true;
                cx.listeners.install(self.scope.owner(), ListenerKind::KeyDown);
                self.enter(parts, cx);

                tracing::debug!(root = %self.scope.root, trap = self.trap.len(), "modal opened");
                cx.emit(&self.scope, "opened");
            }
        }
    }

    /// Back from `closing`: the hide never happens, the listener and scroll
    /// lock stay, and the focus trap is rebuilt.
    fn reopen(&mut self, cx: &mut Context) {
        let Some(parts) = self.parts else {
            return;
        };
        if let Some(handle) = self.pending_hide.take() {
            cx.scheduler.cancel(handle);
        }
        for el in [parts.backdrop, parts.dialog].into_iter().flatten() {
            cx.doc.remove_class(el, FADE_OUT);
            cx.doc.add_class(el, FADE_IN);
        }
        self.enter(parts, cx);
        tracing::debug!(root = %self.scope.root, "modal reopened before hide");
    }

    fn enter(&mut self, parts: ModalParts, cx: &mut Context) {
        self.trap = parts
            .dialog
            .map(|dialog| FocusSet::collect(&cx.doc, dialog, TRAP_FOCUSABLE))
            .unwrap_or_default();
        if let Some(handle) = self.pending_focus.take() {
            cx.scheduler.cancel(handle);
        }
        self.pending_focus = Some(cx.scheduler.request_frame(self.scope.owner(), Task::FocusInitial));
        self.state = ModalState::Open;
    }

    fn focus_initial(&mut self, cx: &mut Context) {
        if self.trap.focus_first(&mut cx.doc).is_none()
            && let Some(dialog) = self.parts.and_then(|p| p.dialog)
        {
            if !cx.doc.has_attribute(dialog, "tabindex") {
                cx.doc.set_attribute(dialog, "tabindex", "-1");
            }
            cx.doc.focus(dialog);
        }
    }

    pub fn close(&mut self, event: Option<&mut Event>, cx: &mut Context) {
        if let Some(event) = event {
            event.prevent_default();
        }
        if !self.is_open() {
            return;
        }
        let Some(parts) = self.parts else {
            return;
        };
        if let Some(handle) = self.pending_focus.take() {
            cx.scheduler.cancel(handle);
        }
        for el in [parts.backdrop, parts.dialog].into_iter().flatten() {
            cx.doc.remove_class(el, FADE_IN);
            cx.doc.add_class(el, FADE_OUT);
        }
        let delay = cx.config.exit_animation;
        self.pending_hide = Some(cx.scheduler.set_timeout(self.scope.owner(), delay, Task::Hide));
        self.state = ModalState::Closing;
        tracing::debug!(root = %self.scope.root, ?delay, "modal closing");
    }

    fn hide(&mut self, cx: &mut Context) {
        if let Some(parts) = self.parts.take() {
            cx.doc.add_class(parts.container, "hidden");
            for el in [parts.backdrop, parts.dialog].into_iter().flatten() {
                cx.doc.remove_class(el, FADE_OUT);
            }
        }
        self.release(cx);
        if let Some(previous) = self.restore_focus.take() {
            cx.doc.focus(previous);
        }
        self.state = ModalState::Closed;

        tracing::debug!(root = %self.scope.root, "modal closed");
        cx.emit(&self.scope, "closed");
    }

    /// Close only when the click landed on the backdrop itself.
    pub fn close_on_backdrop(&mut self, event: &mut Event, cx: &mut Context) {
        if self.options.backdrop_close && event.current_target == Some(event.target) {
            self.close(Some(event), cx);
        }
    }

    pub fn confirm(&mut self, event: Option<&mut Event>, cx: &mut Context) {
        cx.emit(&self.scope, "confirmed");
        self.close(event, cx);
    }

    pub fn cancel(&mut self, event: Option<&mut Event>, cx: &mut Context) {
        cx.emit(&self.scope, "cancelled");
        self.close(event, cx);
    }

    fn handle_tab(&self, event: &mut Event, cx: &mut Context) {
        let (Some(first), Some(last)) = (self.trap.first(), self.trap.last()) else {
            return;
        };
        let active = cx.doc.active_element();
        let shift = event.keyboard.is_some_and(|k| k.shift());
        if shift && active == Some(first) {
            event.prevent_default();
            cx.doc.focus(last);
        } else if !shift && active == Some(last) {
            event.prevent_default();
            cx.doc.focus(first);
        }
    }

    /// Give back everything held between open and the terminal hide.
    fn release(&mut self, cx: &mut Context) {
        cx.listeners.uninstall(self.scope.owner(), &ListenerKind::KeyDown);
        if self.holds_scroll_lock {
            cx.scroll_lock.release(&mut cx.doc);
            self.holds_scroll_lock = false;
        }
        for handle in [self.pending_focus.take(), self.pending_hide.take()].into_iter().flatten() {
            cx.scheduler.cancel(handle);
        }
    }
}

impl Controller for Modal {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn invoke(&mut self, method: &str, event: &mut Event, cx: &mut Context) -> bool {
        match method {
            "open" => self.open(Some(event), cx),
            "close" => self.close(Some(event), cx),
            "closeOnBackdrop" => self.close_on_backdrop(event, cx),
            "confirm" => self.confirm(Some(event), cx),
            "cancel" => self.cancel(Some(event), cx),
            _ => return false,
        }
        true
    }

    fn document_key(&mut self, event: &mut Event, cx: &mut Context) {
        profile_function!();
        match event.key() {
            Some(Key::Escape) if self.options.escape_close => {
                event.prevent_default();
                self.close(Some(event), cx);
            }
            Some(Key::Tab) => self.handle_tab(event, cx),
            _ => {}
        }
    }

    fn timer(&mut self, handle: TimerHandle, task: Task, cx: &mut Context) {
        match task {
            Task::FocusInitial if self.pending_focus == Some(handle) => {
                self.pending_focus = None;
                self.focus_initial(cx);
            }
            Task::Hide if self.pending_hide == Some(handle) => {
                self.pending_hide = None;
                self.hide(cx);
            }
            _ => tracing::trace!(?task, "stale modal task ignored"),
        }
    }

    fn disconnect(&mut self, cx: &mut Context) {
        if self.state == ModalState::Closing {
            self.hide(cx);
            return;
        }
        self.release(cx);
        self.state = ModalState::Closed;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn construct(scope: Scope, cx: &mut Context) -> Box<dyn Controller> {
    Box::new(Modal::attach(scope, cx))
}
