//! Builder for a connected [`Page`].

use std::time::Duration;

use trellis_core::Config;
use trellis_dom::Document;
use trellis_ui::{Constructor, Page};

/// Builds a [`Page`] and connects it.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use trellis::PageBuilder;
/// use trellis::dom::Document;
///
/// let page = PageBuilder::new(Document::new())
///     .exit_animation(Duration::from_millis(150))
///     .build();
/// assert_eq!(page.config().exit_animation, Duration::from_millis(150));
/// ```
pub struct PageBuilder {
    doc: Document,
    config: Config,
    controllers: Vec<(String, Constructor)>,
    connect: bool,
}

impl PageBuilder {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            config: Config::default(),
            controllers: Vec::new(),
            connect: true,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn exit_animation(mut self, delay: Duration) -> Self {
        self.config = self.config.with_exit_animation(delay);
        self
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_frame_interval(interval);
        self
    }

    pub fn toast_container_id(mut self, id: impl Into<String>) -> Self {
        self.config = self.config.with_toast_container_id(id);
        self
    }

    /// Register an extra controller alongside the built-in ones.
    pub fn controller(mut self, identifier: impl Into<String>, constructor: Constructor) -> Self {
        self.controllers.push((identifier.into(), constructor));
        self
    }

    /// Skip the initial [`Page::connect`].
    pub fn deferred(mut self) -> Self {
        self.connect = false;
        self
    }

    pub fn build(self) -> Page {
        let mut page = Page::new(self.doc, self.config);
        for (identifier, constructor) in self.controllers {
            page.register(identifier, constructor);
        }
        if self.connect {
            let attached = page.connect();
            tracing::info!(attached, "page ready");
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use trellis_dom::Event;
    use trellis_test_utils::{dropdown_fixture, modal_fixture};
    use trellis_ui::{Context, Controller, Scope};

    #[derive(Debug)]
    struct Clicks {
        scope: Scope,
        count: usize,
    }

    impl Controller for Clicks {
        fn scope(&self) -> &Scope {
            &self.scope
        }

        fn invoke(&mut self, method: &str, _event: &mut Event, _cx: &mut Context) -> bool {
            if method == "bump" {
                self.count += 1;
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

    fn clicks(scope: Scope, _cx: &mut Context) -> Box<dyn Controller> {
        Box::new(Clicks { scope, count: 0 })
    }

    #[test]
    fn test_build_connects() {
        let fixture = dropdown_fixture(2);
        let page = PageBuilder::new(fixture.doc.clone()).build();
        assert!(page.is_attached(fixture.id("root"), "dropdown"));
    }

    #[test]
    fn test_deferred_skips_connect() {
        let fixture = dropdown_fixture(2);
        let page = PageBuilder::new(fixture.doc.clone()).deferred().build();
        assert_eq!(page.attached(), 0);
    }

    #[test]
    fn test_config_overrides() {
        let fixture = modal_fixture(1);
        let mut page = PageBuilder::new(fixture.doc.clone())
            .exit_animation(Duration::from_millis(50))
            .frame_interval(Duration::from_millis(10))
            .build();

        page.click(fixture.id("opener"));
        page.advance(Duration::from_millis(10));
        assert_eq!(page.document().active_element(), Some(fixture.id("field-0")));

        page.click(fixture.id("close"));
        page.advance(Duration::from_millis(50));
        assert!(page.document().has_class(fixture.id("container"), "hidden"));
    }

    #[test]
    fn test_custom_controller() {
        let fixture = dropdown_fixture(1);
        let mut doc = fixture.doc.clone();
        let outside = fixture.id("outside");
        doc.set_attribute(outside, "data-controller", "clicks");
        doc.set_attribute(outside, "data-action", "clicks#bump");

        let mut page = PageBuilder::new(doc).controller("clicks", clicks).build();
        page.click(outside);
        page.click(outside);

        let count = page.controller::<Clicks>(outside, "clicks").map(|c| c.count);
        assert_eq!(count, Some(2));
    }
}
