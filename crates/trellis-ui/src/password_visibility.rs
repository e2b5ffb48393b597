//! Show/hide toggle for password inputs.

use std::any::Any;

use trellis_dom::{ElementId, Event};

use crate::attach::Scope;
use crate::controller::{Context, Controller};

pub const IDENTIFIER: &str = "password-visibility";

pub const SHOWN_ICON: &str = "🙈";
pub const HIDDEN_ICON: &str = "👁";

#[derive(Debug)]
pub struct PasswordVisibility {
    scope: Scope,
    input: Option<ElementId>,
    icon: Option<ElementId>,
}

impl PasswordVisibility {
    pub fn attach(scope: Scope, cx: &mut Context) -> Self {
        let input = scope.target(&cx.doc, "input");
        let icon = scope.target(&cx.doc, "icon");
        Self { scope, input, icon }
    }

    /// Whether the input currently shows its value in clear text.
    pub fn is_revealed(&self, cx: &Context) -> bool {
        self.input
            .is_some_and(|input| cx.doc.attribute(input, "type") == Some("text"))
    }

    pub fn toggle(&mut self, cx: &mut Context) {
        let Some(input) = self.input else {
            return;
        };
        let (kind, icon) = if cx.doc.attribute(input, "type") == Some("password") {
            ("text", SHOWN_ICON)
        } else {
            ("password", HIDDEN_ICON)
        };
        cx.doc.set_attribute(input, "type", kind);
        if let Some(el) = self.icon {
            cx.doc.set_text(el, icon);
        }
        tracing::debug!(root = %self.scope.root, kind, "password visibility toggled");
    }
}

impl Controller for PasswordVisibility {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn invoke(&mut self, method: &str, _event: &mut Event, cx: &mut Context) -> bool {
        match method {
            "toggle" => {
                self.toggle(cx);
                true
            }
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn construct(scope: Scope, cx: &mut Context) -> Box<dyn Controller> {
    Box::new(PasswordVisibility::attach(scope, cx))
}
