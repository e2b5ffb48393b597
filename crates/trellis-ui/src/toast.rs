//! Toast notifications.
//!
//! Two pieces cooperate here:
//!
//! - [`ToastRegistry`] is page-wide. It owns every live entry and the timers
//!   driving its expiry and exit animation. Entries are independent of each
//!   other and of the manager that created them: detaching a manager leaves
//!   its toasts running until they expire or are dismissed.
//! - [`ToastManager`] is the attachable widget. It reads a message from a
//!   trigger element or from the global `toast:show` notification and asks
//!   the registry to render it.
//!
//! ```text
//! <div data-controller="toast" data-toast-position-value="bottom-center">
//!   <button data-action="click->toast#show"
//!           data-toast-message="Saved" data-toast-type="success">Save</button>
//! </div>
//! ```

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use indexmap::IndexMap;
use trellis_core::Config;
use trellis_dom::{Document, ElementId, Event};
use trellis_runtime::{Detail, ListenerKind, NotificationBus, Owner, Scheduler, TimerHandle};

use crate::attach::{OptionError, Scope};
use crate::controller::{Context, Controller, Task};

pub const IDENTIFIER: &str = "toast";

/// Name of the global notification that raises a toast.
pub const SHOW_EVENT: &str = "toast:show";

/// Attribute on a toast's close button naming the entry it dismisses.
pub const DISMISS_ATTRIBUTE: &str = "data-toast-dismiss";

const ENTER: &str = "animate-slide-in-down";
const EXIT: &str = "animate-fade-out";
const ENTRY_BASE: &str = "max-w-sm w-full bg-white shadow-lg rounded-lg pointer-events-auto p-4";
const CONTAINER_SUFFIX: &str = "z-[120] flex flex-col gap-2 pointer-events-none";
const DEFAULT_DURATION_MS: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    /// Lenient parse: anything unrecognised is `Info`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "success" => Severity::Success,
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Severity::Success => "green",
            Severity::Error => "red",
            Severity::Warning => "yellow",
            Severity::Info => "blue",
        }
    }

    /// Class list of an entry with this severity.
    pub fn entry_classes(&self) -> String {
        format!("{ENTRY_BASE} border-l-4 border-{}-500", self.color())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
    TopCenter,
    BottomCenter,
}

impl ToastPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastPosition::TopRight => "top-right",
            ToastPosition::TopLeft => "top-left",
            ToastPosition::BottomRight => "bottom-right",
            ToastPosition::BottomLeft => "bottom-left",
            ToastPosition::TopCenter => "top-center",
            ToastPosition::BottomCenter => "bottom-center",
        }
    }

    /// Full class list of a container at this position.
    pub fn container_classes(&self) -> String {
        let anchor = match self {
            ToastPosition::TopRight => "fixed top-4 right-4",
            ToastPosition::TopLeft => "fixed top-4 left-4",
            ToastPosition::BottomRight => "fixed bottom-4 right-4",
            ToastPosition::BottomLeft => "fixed bottom-4 left-4",
            ToastPosition::TopCenter => "fixed top-4 left-1/2 -translate-x-1/2",
            ToastPosition::BottomCenter => "fixed bottom-4 left-1/2 -translate-x-1/2",
        };
        format!("{anchor} {CONTAINER_SUFFIX}")
    }
}

impl FromStr for ToastPosition {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top-right" => Ok(ToastPosition::TopRight),
            "top-left" => Ok(ToastPosition::TopLeft),
            "bottom-right" => Ok(ToastPosition::BottomRight),
            "bottom-left" => Ok(ToastPosition::BottomLeft),
            "top-center" => Ok(ToastPosition::TopCenter),
            "bottom-center" => Ok(ToastPosition::BottomCenter),
            other => Err(OptionError::Choice {
                option: "position".to_string(),
                value: other.to_string(),
                expected: "top-right, top-left, bottom-right, bottom-left, top-center, bottom-center",
            }),
        }
    }
}

/// Payload of the global `toast:show` notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToastRequest {
    pub message: String,
    /// Severity name; unknown names render as `info`.
    pub kind: Option<String>,
    /// `None` uses the manager's default, `Some(Duration::ZERO)` is persistent.
    pub duration: Option<Duration>,
}

impl ToastRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// One live toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastEntry {
    pub id: ToastId,
    pub element: ElementId,
    pub message: String,
    pub severity: Severity,
    /// Zero means persistent.
    pub duration: Duration,
    pub created_at: Duration,
    pub position: ToastPosition,
    expiry: Option<TimerHandle>,
    erase: Option<TimerHandle>,
}

impl ToastEntry {
    pub fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }

    /// The exit animation is running.
    pub fn is_leaving(&self) -> bool {
        self.erase.is_some()
    }

    pub fn expiry(&self) -> Option<TimerHandle> {
        self.expiry
    }
}

/// Everything needed to render one entry.
#[derive(Debug, Clone)]
pub struct NewToast<'a> {
    pub container: ElementId,
    pub message: &'a str,
    pub severity: Severity,
    pub duration: Duration,
    pub position: ToastPosition,
}

/// Page-wide registry of live toast entries.
#[derive(Debug, Default)]
pub struct ToastRegistry {
    entries: IndexMap<ToastId, ToastEntry>,
    next_id: u64,
    container: Option<ElementId>,
}

impl ToastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ToastId) -> Option<&ToastEntry> {
        self.entries.get(&id)
    }

    /// Live entries in creation order, including ones still animating out.
    pub fn entries(&self) -> impl Iterator<Item = &ToastEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The singleton container created on demand, if any.
    pub fn shared_container(&self) -> Option<ElementId> {
        self.container
    }

    /// The page's singleton container: found by id, or created once and
    /// appended to the body.
    pub fn singleton_container(&mut self, doc: &mut Document, config: &Config, position: ToastPosition) -> ElementId {
        if let Some(existing) = doc.get_element_by_id(&config.toast_container_id) {
            return existing;
        }
        let container = match self.container {
            Some(cached) => cached,
            None => {
                let created = doc.create_element("div");
                doc.set_attribute(created, "id", config.toast_container_id.as_str());
                doc.set_class_name(created, &position.container_classes());
                tracing::debug!(%created, "toast container created");
                self.container = Some(created);
                created
            }
        };
        doc.append_child(doc.body(), container);
        container
    }

    /// Render an entry into `toast.container` and schedule its expiry.
    pub fn create(
        &mut self,
        toast: NewToast<'_>,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
    ) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        let element = render(doc, id, toast.message, toast.severity);
        doc.append_child(toast.container, element);

        let expiry = (!toast.duration.is_zero())
            .then(|| scheduler.set_timeout(Owner::Toasts, toast.duration, Task::ToastExpire(id)));
        self.entries.insert(
            id,
            ToastEntry {
                id,
                element,
                message: toast.message.to_string(),
                severity: toast.severity,
                duration: toast.duration,
                created_at: scheduler.now(),
                position: toast.position,
                expiry,
                erase: None,
            },
        );
        tracing::debug!(%id, severity = toast.severity.as_str(), duration = ?toast.duration, "toast created");
        id
    }

    /// Start removing an entry. Expiry and manual dismissal both end up here.
    ///
    /// Returns false when the entry is gone or already leaving. An entry
    /// whose element was taken out of the document has nothing left to
    /// animate, so it is dropped right away and false is returned.
    pub fn remove(
        &mut self,
        id: ToastId,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        config: &Config,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        if entry.erase.is_some() {
            return false;
        }
        if !doc.is_connected(entry.element) {
            if let Some(entry) = self.entries.shift_remove(&id) {
                for handle in [entry.expiry, entry.erase].into_iter().flatten() {
                    scheduler.cancel(handle);
                }
            }
            tracing::debug!(%id, "toast element detached, entry dropped");
            return false;
        }
        if let Some(expiry) = entry.expiry.take() {
            scheduler.cancel(expiry);
        }
        doc.remove_class(entry.element, ENTER);
        doc.add_class(entry.element, EXIT);
        entry.erase = Some(scheduler.set_timeout(Owner::Toasts, config.exit_animation, Task::ToastErase(id)));
        tracing::debug!(%id, "toast leaving");
        true
    }

    /// Deliver a registry timer.
    pub fn fire(
        &mut self,
        handle: TimerHandle,
        task: Task,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        config: &Config,
    ) {
        match task {
            Task::ToastExpire(id) => {
                if let Some(entry) = self.entries.get_mut(&id)
                    && entry.expiry == Some(handle)
                {
                    entry.expiry = None;
                    self.remove(id, doc, scheduler, config);
                }
            }
            Task::ToastErase(id) => {
                if self.entries.get(&id).is_some_and(|e| e.erase == Some(handle))
                    && let Some(entry) = self.entries.shift_remove(&id)
                {
                    doc.remove(entry.element);
                    tracing::debug!(%id, "toast removed");
                }
            }
            _ => tracing::trace!(?task, "unexpected task for toast registry"),
        }
    }

    /// Find the entry an element belongs to via its dismiss affordance.
    pub fn dismiss_target(&self, doc: &Document, target: ElementId) -> Option<ToastId> {
        std::iter::once(target)
            .chain(doc.ancestors(target))
            .find_map(|el| doc.attribute(el, DISMISS_ATTRIBUTE))
            .and_then(|value| value.parse().ok())
            .map(ToastId)
    }
}

fn render(doc: &mut Document, id: ToastId, message: &str, severity: Severity) -> ElementId {
    let toast = doc.create_element("div");
    doc.set_class_name(toast, &severity.entry_classes());
    doc.set_attribute(toast, "role", "alert");
    doc.set_attribute(toast, "aria-live", "polite");
    doc.set_attribute(toast, "data-toast-id", id.0.to_string());
    doc.add_class(toast, ENTER);

    let row = element(doc, toast, "div", "flex items-start gap-3");
    let icon_slot = element(doc, row, "div", "flex-shrink-0");
    let icon = element(doc, icon_slot, "span", &format!("h-5 w-5 text-{}-500", severity.color()));
    doc.set_attribute(icon, "data-toast-icon", severity.as_str());

    let body = element(doc, row, "div", "flex-1 min-w-0");
    let text = element(doc, body, "p", "text-sm font-medium");
    doc.set_text(text, message);

    let close = element(
        doc,
        row,
        "button",
        "flex-shrink-0 ml-2 inline-flex text-gray-400 hover:text-gray-600 focus:outline-none",
    );
    doc.set_attribute(close, "type", "button");
    doc.set_attribute(close, DISMISS_ATTRIBUTE, id.0.to_string());
    let label = element(doc, close, "span", "sr-only");
    doc.set_text(label, "Close");
    toast
}

fn element(doc: &mut Document, parent: ElementId, tag: &str, classes: &str) -> ElementId {
    let el = doc.create_element(tag);
    doc.set_class_name(el, classes);
    doc.append_child(parent, el);
    el
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastOptions {
    /// Default time to live.
    pub duration: Duration,
    pub position: ToastPosition,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(DEFAULT_DURATION_MS as u64),
            position: ToastPosition::default(),
        }
    }
}

/// Milliseconds as a time to live. Non-positive values mean persistent.
fn millis(value: f64) -> Duration {
    if value > 0.0 {
        Duration::from_millis(value as u64)
    } else {
        Duration::ZERO
    }
}

/// The attachable toast widget.
#[derive(Debug)]
pub struct ToastManager {
    scope: Scope,
    container: Option<ElementId>,
    options: ToastOptions,
}

impl ToastManager {
    pub fn attach(scope: Scope, cx: &mut Context) -> Self {
        let container = scope.target(&cx.doc, "container");
        let reader = scope.options(&cx.doc);
        let options = ToastOptions {
            duration: millis(reader.number("duration", DEFAULT_DURATION_MS)),
            position: reader.coerce("position", ToastPosition::default(), |_, raw| raw.parse()),
        };
        if let Some(container) = container {
            cx.doc.set_class_name(container, &options.position.container_classes());
        }
        cx.listeners
            .install(scope.owner(), ListenerKind::Notification(SHOW_EVENT.to_string()));
        tracing::debug!(root = %scope.root, ?options, "toast manager attached");
        Self { scope, container, options }
    }

    pub fn options(&self) -> ToastOptions {
        self.options
    }

    /// Declared container target, else the page's singleton container.
    pub fn container(&self, cx: &mut Context) -> ElementId {
        match self.container {
            Some(container) => container,
            None => cx.toasts.singleton_container(&mut cx.doc, &cx.config, self.options.position),
        }
    }

    /// Show a toast described by the event's current target:
    /// `data-toast-message`, `data-toast-type` and `data-toast-duration`.
    pub fn show(&mut self, event: &Event, cx: &mut Context) -> Option<ToastId> {
        let source = event.current_target.unwrap_or(event.target);
        let message = cx.doc.attribute(source, "data-toast-message").unwrap_or_default().to_string();
        if message.is_empty() {
            return None;
        }
        let severity = Severity::parse(cx.doc.attribute(source, "data-toast-type").unwrap_or("info"));
        let duration = match cx.doc.attribute(source, "data-toast-duration") {
            Some(raw) => match crate::attach::parse_number("duration", raw) {
                Ok(ms) => millis(ms),
                Err(err) => {
                    tracing::warn!(%err, "using default toast duration");
                    self.options.duration
                }
            },
            None => self.options.duration,
        };
        Some(self.create_toast(&message, severity, duration, cx))
    }

    /// Handle a global show request. Empty messages are ignored.
    pub fn handle_request(&mut self, request: &ToastRequest, cx: &mut Context) -> Option<ToastId> {
        if request.message.is_empty() {
            return None;
        }
        let severity = request.kind.as_deref().map(Severity::parse).unwrap_or_default();
        let duration = request.duration.unwrap_or(self.options.duration);
        Some(self.create_toast(&request.message, severity, duration, cx))
    }

    /// Render one entry. A zero `duration` makes it persistent.
    pub fn create_toast(&mut self, message: &str, severity: Severity, duration: Duration, cx: &mut Context) -> ToastId {
        let container = self.container(cx);
        let toast = NewToast {
            container,
            message,
            severity,
            duration,
            position: self.options.position,
        };
        let id = cx.toasts.create(toast, &mut cx.doc, &mut cx.scheduler);
        emit_shown(&mut cx.notifications, &self.scope, message, severity);
        id
    }

    pub fn success(&mut self, message: &str, duration: Option<Duration>, cx: &mut Context) -> ToastId {
        self.create_toast(message, Severity::Success, duration.unwrap_or(self.options.duration), cx)
    }

    pub fn error(&mut self, message: &str, duration: Option<Duration>, cx: &mut Context) -> ToastId {
        self.create_toast(message, Severity::Error, duration.unwrap_or(self.options.duration), cx)
    }

    pub fn warning(&mut self, message: &str, duration: Option<Duration>, cx: &mut Context) -> ToastId {
        self.create_toast(message, Severity::Warning, duration.unwrap_or(self.options.duration), cx)
    }

    pub fn info(&mut self, message: &str, duration: Option<Duration>, cx: &mut Context) -> ToastId {
        self.create_toast(message, Severity::Info, duration.unwrap_or(self.options.duration), cx)
    }
}

fn emit_shown(bus: &mut NotificationBus, scope: &Scope, message: &str, severity: Severity) {
    let detail = Detail::Toast {
        message: message.to_string(),
        kind: severity.as_str().to_string(),
    };
    bus.emit(&scope.identifier, "shown", scope.root, Some(detail));
}

impl Controller for ToastManager {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn invoke(&mut self, method: &str, event: &mut Event, cx: &mut Context) -> bool {
        match method {
            "show" => {
                self.show(event, cx);
                true
            }
            _ => false,
        }
    }

    fn toast_request(&mut self, request: &ToastRequest, cx: &mut Context) {
        self.handle_request(request, cx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn construct(scope: Scope, cx: &mut Context) -> Box<dyn Controller> {
    Box::new(ToastManager::attach(scope, cx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_runtime::WidgetKey;

    fn setup() -> (Context, ToastManager) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root);
        let mut cx = Context::new(doc, Config::default());
        let manager = ToastManager::attach(Scope::new(WidgetKey(1), root, IDENTIFIER), &mut cx);
        (cx, manager)
    }

    fn run(cx: &mut Context, ms: u64) {
        let until = cx.scheduler.now().saturating_add(Duration::from_millis(ms));
        while let Some(fired) = cx.scheduler.pop_due(until) {
            cx.toasts.fire(fired.handle, fired.task, &mut cx.doc, &mut cx.scheduler, &cx.config);
        }
        cx.scheduler.settle(until);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("error"), Severity::Error);
        assert_eq!(Severity::parse("catastrophe"), Severity::Info);
        assert!(Severity::Warning.entry_classes().ends_with("border-l-4 border-yellow-500"));
    }

    #[test]
    fn test_container_classes() {
        assert_eq!(
            ToastPosition::TopCenter.container_classes(),
            "fixed top-4 left-1/2 -translate-x-1/2 z-[120] flex flex-col gap-2 pointer-events-none"
        );
    }

    #[test]
    fn test_singleton_container_created_once() {
        let (mut cx, mut manager) = setup();
        manager.info("one", None, &mut cx);
        manager.info("two", None, &mut cx);
        let container = cx.doc.get_element_by_id("toast-container").unwrap();
        assert_eq!(cx.doc.children(container).len(), 2);
        assert_eq!(cx.toasts.shared_container(), Some(container));
        assert_eq!(cx.doc.parent(container), Some(cx.doc.body()));
    }

    #[test]
    fn test_message_is_literal_text() {
        let (mut cx, mut manager) = setup();
        let id = manager.error("<img src=x onerror=alert(1)>", None, &mut cx);
        let entry = cx.toasts.get(id).unwrap().clone();
        let paragraph = cx
            .doc
            .descendants(entry.element)
            .into_iter()
            .find(|el| cx.doc.get(*el).is_some_and(|e| e.tag() == "p"))
            .unwrap();
        assert_eq!(cx.doc.text(paragraph), Some("<img src=x onerror=alert(1)>"));
        assert!(cx.doc.descendants(paragraph).is_empty());
    }

    #[test]
    fn test_expiry_then_erase() {
        let (mut cx, mut manager) = setup();
        let id = manager.info("X", Some(Duration::from_millis(100)), &mut cx);
        let element = cx.toasts.get(id).unwrap().element;

        run(&mut cx, 100);
        assert!(cx.toasts.get(id).unwrap().is_leaving());
        assert!(cx.doc.has_class(element, EXIT));
        run(&mut cx, 200);
        assert!(cx.toasts.get(id).is_none());
        assert!(!cx.doc.is_connected(element));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut cx, mut manager) = setup();
        let id = manager.success("Saved", Some(Duration::ZERO), &mut cx);
        assert_eq!(cx.scheduler.pending(), 0);

        assert!(cx.toasts.remove(id, &mut cx.doc, &mut cx.scheduler, &cx.config));
        assert!(!cx.toasts.remove(id, &mut cx.doc, &mut cx.scheduler, &cx.config));
        assert_eq!(cx.scheduler.pending(), 1);
        run(&mut cx, 200);
        assert!(!cx.toasts.remove(id, &mut cx.doc, &mut cx.scheduler, &cx.config));
    }

    #[test]
    fn test_detached_element_drops_entry() {
        let (mut cx, mut manager) = setup();
        let id = manager.info("Gone", Some(Duration::from_millis(100)), &mut cx);
        let element = cx.toasts.get(id).unwrap().element;
        cx.doc.remove(element);

        assert!(!cx.toasts.remove(id, &mut cx.doc, &mut cx.scheduler, &cx.config));
        assert!(cx.toasts.get(id).is_none());
        assert_eq!(cx.scheduler.pending(), 0);
    }

    #[test]
    fn test_shown_detail() {
        let (mut cx, mut manager) = setup();
        manager.handle_request(&ToastRequest::new("Hi").kind("bogus"), &mut cx);
        let shown = cx.notifications.drain();
        assert_eq!(shown[0].name, "toast:shown");
        assert_eq!(
            shown[0].detail,
            Some(Detail::Toast { message: "Hi".into(), kind: "info".into() })
        );
    }

    #[test]
    fn test_empty_request_ignored() {
        let (mut cx, mut manager) = setup();
        assert_eq!(manager.handle_request(&ToastRequest::new(""), &mut cx), None);
        assert!(cx.toasts.is_empty());
    }

    #[test]
    fn test_dismiss_target() {
        let (mut cx, mut manager) = setup();
        let id = manager.warning("Careful", None, &mut cx);
        let element = cx.toasts.get(id).unwrap().element;
        let label = cx
            .doc
            .descendants(element)
            .into_iter()
            .find(|el| cx.doc.has_class(*el, "sr-only"))
            .unwrap();
        assert_eq!(cx.toasts.dismiss_target(&cx.doc, label), Some(id));
        assert_eq!(cx.toasts.dismiss_target(&cx.doc, element), None);
    }
}
