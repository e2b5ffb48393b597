//! The attachment contract shared by every widget.
//!
//! A widget binds to a root element carrying `data-controller="<identifier>"`.
//! Everything else is read declaratively from the markup:
//!
//! - targets: `data-<identifier>-target="<name>"` on the root or a descendant
//! - options: `data-<identifier>-<option>-value="..."` on the root
//! - actions: `data-action="click-><identifier>#<method>"` on any element
//!
//! Missing targets resolve to `None` and malformed option values fall back to
//! the declared default, so attaching never fails on incomplete markup.

use trellis_dom::{Document, ElementId, EventKind};
use trellis_runtime::{Owner, WidgetKey};

/// Identity of an attached widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub key: WidgetKey,
    pub root: ElementId,
    pub identifier: String,
}

impl Scope {
    pub fn new(key: WidgetKey, root: ElementId, identifier: impl Into<String>) -> Self {
        Self {
            key,
            root,
            identifier: identifier.into(),
        }
    }

    pub fn owner(&self) -> Owner {
        Owner::Widget(self.key)
    }

    /// First element named `name` in this widget's root, root included.
    pub fn target(&self, doc: &Document, name: &str) -> Option<ElementId> {
        find_target(doc, self.root, &self.identifier, name)
    }

    pub fn options<'a>(&'a self, doc: &'a Document) -> OptionReader<'a> {
        OptionReader {
            doc,
            root: self.root,
            identifier: &self.identifier,
        }
    }
}

/// Attribute naming the targets of `identifier`.
pub fn target_attribute(identifier: &str) -> String {
    format!("data-{identifier}-target")
}

/// Find the first element under `scope` (inclusive, tree order) whose target
/// attribute for `identifier` lists `name`.
pub fn find_target(doc: &Document, scope: ElementId, identifier: &str, name: &str) -> Option<ElementId> {
    let attribute = target_attribute(identifier);
    std::iter::once(scope)
        .chain(doc.descendants(scope))
        .find(|el| {
            doc.attribute(*el, &attribute)
                .is_some_and(|names| names.split_whitespace().any(|n| n == name))
        })
}

/// Identifiers listed in an element's `data-controller` attribute.
pub fn controllers_of(doc: &Document, el: ElementId) -> Vec<&str> {
    doc.attribute(el, "data-controller")
        .map(|value| value.split_whitespace().collect())
        .unwrap_or_default()
}

// --- options ---

/// Errors produced while coercing a declarative option value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("option `{option}`: expected a boolean, found {value:?}")]
    Boolean { option: String, value: String },
    #[error("option `{option}`: expected a number, found {value:?}")]
    Number { option: String, value: String },
    #[error("option `{option}`: {value:?} is not one of {expected}")]
    Choice {
        option: String,
        value: String,
        expected: &'static str,
    },
}

/// `closeOnSelect` becomes `close-on-select`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Attribute carrying option `name` of `identifier`.
pub fn option_attribute(identifier: &str, name: &str) -> String {
    format!("data-{identifier}-{}-value", kebab_case(name))
}

pub fn parse_bool(option: &str, value: &str) -> Result<bool, OptionError> {
    match value.trim() {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(OptionError::Boolean {
            option: option.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_number(option: &str, value: &str) -> Result<f64, OptionError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| OptionError::Number {
            option: option.to_string(),
            value: value.to_string(),
        })
}

/// Typed access to the declarative options on a widget root.
#[derive(Debug, Clone, Copy)]
pub struct OptionReader<'a> {
    doc: &'a Document,
    root: ElementId,
    identifier: &'a str,
}

impl<'a> OptionReader<'a> {
    pub fn new(doc: &'a Document, root: ElementId, identifier: &'a str) -> Self {
        Self { doc, root, identifier }
    }

    /// Raw attribute value, if declared.
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        self.doc.attribute(self.root, &option_attribute(self.identifier, name))
    }

    pub fn string(&self, name: &str, default: &str) -> String {
        self.raw(name).unwrap_or(default).to_string()
    }

    pub fn boolean(&self, name: &str, default: bool) -> bool {
        self.coerce(name, default, parse_bool)
    }

    pub fn number(&self, name: &str, default: f64) -> f64 {
        self.coerce(name, default, parse_number)
    }

    /// Parse with `parse`, logging and falling back to `default` on error.
    pub fn coerce<T>(
        &self,
        name: &str,
        default: T,
        parse: impl FnOnce(&str, &str) -> Result<T, OptionError>,
    ) -> T {
        let Some(raw) = self.raw(name) else {
            return default;
        };
        match parse(name, raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(identifier = self.identifier, %err, "falling back to default");
                default
            }
        }
    }
}

// --- actions ---

/// A parsed `event->identifier#method` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub event: EventKind,
    pub identifier: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("action descriptor {0:?} is missing `#method`")]
    MissingMethod(String),
    #[error("action descriptor {0:?} has an empty identifier or method")]
    Incomplete(String),
    #[error("unsupported event {event:?} in action descriptor {descriptor:?}")]
    UnknownEvent { event: String, descriptor: String },
}

impl Action {
    /// Parse a single descriptor. The event defaults to `click` when omitted.
    pub fn parse(descriptor: &str) -> Result<Self, ActionParseError> {
        let (event, handler) = match descriptor.split_once("->") {
            Some((event, handler)) => {
                let kind = EventKind::from_name(event).ok_or_else(|| ActionParseError::UnknownEvent {
                    event: event.to_string(),
                    descriptor: descriptor.to_string(),
                })?;
                (kind, handler)
            }
            None => (EventKind::Click, descriptor),
        };
        let (identifier, method) = handler
            .split_once('#')
            .ok_or_else(|| ActionParseError::MissingMethod(descriptor.to_string()))?;
        if identifier.is_empty() || method.is_empty() {
            return Err(ActionParseError::Incomplete(descriptor.to_string()));
        }
        Ok(Self {
            event,
            identifier: identifier.to_string(),
            method: method.to_string(),
        })
    }
}

/// Parse every descriptor in a `data-action` value, skipping malformed ones.
pub fn parse_actions(value: &str) -> Vec<Action> {
    value
        .split_whitespace()
        .filter_map(|descriptor| match Action::parse(descriptor) {
            Ok(action) => Some(action),
            Err(err) => {
                tracing::warn!(%err, "skipping action descriptor");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("closeOnSelect"), "close-on-select");
        assert_eq!(kebab_case("remote"), "remote");
        assert_eq!(option_attribute("modal", "backdropClose"), "data-modal-backdrop-close-value");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("x", "true"), Ok(true));
        assert_eq!(parse_bool("x", ""), Ok(true));
        assert_eq!(parse_bool("x", "0"), Ok(false));
        assert_eq!(parse_bool("x", " false "), Ok(false));
        assert!(matches!(parse_bool("x", "yes"), Err(OptionError::Boolean { .. })));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("duration", "3000"), Ok(3000.0));
        assert_eq!(parse_number("duration", "2.5"), Ok(2.5));
        assert!(parse_number("duration", "soon").is_err());
        assert!(parse_number("duration", "NaN").is_err());
    }

    #[test]
    fn test_option_reader_falls_back() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root);
        doc.set_attribute(root, "data-dropdown-close-on-select-value", "false");
        doc.set_attribute(root, "data-toast-duration-value", "later");

        let dropdown = OptionReader::new(&doc, root, "dropdown");
        assert!(!dropdown.boolean("closeOnSelect", true));
        assert_eq!(dropdown.string("placement", "bottom-start"), "bottom-start");

        let toast = OptionReader::new(&doc, root, "toast");
        assert_eq!(toast.number("duration", 5000.0), 5000.0);
    }

    #[test]
    fn test_find_target_includes_root() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(doc.body(), root);
        doc.append_child(root, child);
        doc.set_attribute(root, "data-toast-target", "container");
        doc.set_attribute(child, "data-modal-target", "backdrop dialog");

        assert_eq!(find_target(&doc, root, "toast", "container"), Some(root));
        assert_eq!(find_target(&doc, root, "modal", "dialog"), Some(child));
        assert_eq!(find_target(&doc, root, "modal", "container"), None);
    }

    #[test]
    fn test_parse_action() {
        let action = Action::parse("click->modal#open").unwrap();
        assert_eq!(action.event, EventKind::Click);
        assert_eq!(action.identifier, "modal");
        assert_eq!(action.method, "open");

        let action = Action::parse("password-visibility#toggle").unwrap();
        assert_eq!(action.event, EventKind::Click);
        assert_eq!(action.identifier, "password-visibility");

        assert_eq!(
            Action::parse("click->modal"),
            Err(ActionParseError::MissingMethod("click->modal".into()))
        );
        assert!(matches!(
            Action::parse("hover->modal#open"),
            Err(ActionParseError::UnknownEvent { .. })
        ));
        assert!(matches!(Action::parse("click->#open"), Err(ActionParseError::Incomplete(_))));
    }

    #[test]
    fn test_parse_actions_skips_malformed() {
        let actions = parse_actions("click->dropdown#toggle bogus keydown->dropdown#select");
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].event, EventKind::KeyDown);
    }
}
