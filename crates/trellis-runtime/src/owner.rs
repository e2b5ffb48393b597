use std::fmt;

/// Identifies one attached widget instance within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetKey(pub u64);

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget-{}", self.0)
    }
}

/// Who owns a timer or a listener.
///
/// Widget-owned resources are released when the widget detaches. Toast entries
/// outlive the manager that created them, so their timers belong to the page's
/// toast registry instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Widget(WidgetKey),
    Toasts,
}

impl From<WidgetKey> for Owner {
    fn from(key: WidgetKey) -> Self {
        Owner::Widget(key)
    }
}
