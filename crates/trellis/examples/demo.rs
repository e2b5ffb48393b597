//! Scripted walkthrough of every built-in widget.
//!
//! Builds a small settings page, drives it with clicks, key presses and clock
//! advances, and prints the notifications each step produced.
//!
//! Run with: RUST_LOG=debug cargo run --example demo

use std::time::Duration;

use trellis::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

struct Ids {
    menu_root: ElementId,
    menu_trigger: ElementId,
    modal_opener: ElementId,
    modal_field: ElementId,
    password_toggle: ElementId,
    password_input: ElementId,
}

fn element(doc: &mut Document, parent: ElementId, tag: &str, attrs: &[(&str, &str)]) -> ElementId {
    let el = doc.create_element(tag);
    for (name, value) in attrs {
        doc.set_attribute(el, name, *value);
    }
    doc.append_child(parent, el);
    el
}

fn build_page() -> (Document, Ids) {
    let mut doc = Document::new();
    let body = doc.body();

    let menu_root = element(&mut doc, body, "div", &[("data-controller", "dropdown")]);
    let menu_trigger = element(
        &mut doc,
        menu_root,
        "button",
        &[("data-dropdown-target", "trigger"), ("data-action", "click->dropdown#toggle")],
    );
    let menu = element(&mut doc, menu_root, "div", &[("data-dropdown-target", "menu")]);
    doc.add_class(menu, "hidden");
    for href in ["/profile", "/billing", "/logout"] {
        element(&mut doc, menu, "a", &[("href", href)]);
    }

    let modal_root = element(&mut doc, body, "div", &[("data-controller", "modal")]);
    let modal_opener = element(&mut doc, modal_root, "button", &[("data-action", "click->modal#open")]);
    let container = element(&mut doc, modal_root, "div", &[("data-modal-target", "container")]);
    doc.add_class(container, "hidden");
    element(
        &mut doc,
        container,
        "div",
        &[("data-modal-target", "backdrop"), ("data-action", "click->modal#closeOnBackdrop")],
    );
    let dialog = element(
        &mut doc,
        container,
        "div",
        &[("data-modal-target", "dialog"), ("role", "dialog")],
    );
    let modal_field = element(&mut doc, dialog, "input", &[("type", "text")]);
    element(&mut doc, dialog, "button", &[("data-action", "click->modal#confirm")]);

    let toasts = element(&mut doc, body, "div", &[("data-controller", "toast")]);
    element(
        &mut doc,
        toasts,
        "button",
        &[
            ("data-action", "click->toast#show"),
            ("data-toast-message", "Profile saved"),
            ("data-toast-type", "success"),
        ],
    );

    let password_root = element(&mut doc, body, "div", &[("data-controller", "password-visibility")]);
    let password_input = element(
        &mut doc,
        password_root,
        "input",
        &[("type", "password"), ("data-password-visibility-target", "input")],
    );
    let password_toggle = element(
        &mut doc,
        password_root,
        "button",
        &[("data-action", "click->password-visibility#toggle")],
    );

    let ids = Ids {
        menu_root,
        menu_trigger,
        modal_opener,
        modal_field,
        password_toggle,
        password_input,
    };
    (doc, ids)
}

fn report(page: &mut Page, step: &str) {
    let names: Vec<String> = page.drain_notifications().into_iter().map(|n| n.name).collect();
    println!("[{:>5}ms] {step}: {names:?}", page.now().as_millis());
}

fn main() {
    trellis::core::logging::init();

    let (doc, ids) = build_page();
    let mut page = PageBuilder::new(doc).build();

    page.click(ids.menu_trigger);
    page.advance(FRAME);
    page.press(Key::ArrowDown);
    report(&mut page, "dropdown opened, second item focused");
    page.press(Key::Escape);
    report(&mut page, "dropdown closed with Escape");
    assert!(!page.dropdown(ids.menu_root).is_some_and(|d| d.is_open()));

    page.click(ids.modal_opener);
    page.advance(FRAME);
    println!("focus inside dialog: {}", page.document().active_element() == Some(ids.modal_field));
    page.key_down(Key::Tab, Modifiers::SHIFT);
    page.press(Key::Escape);
    page.advance(page.config().exit_animation);
    report(&mut page, "modal opened and dismissed");

    page.notify(ToastRequest::new("Background sync finished").duration(Duration::from_millis(800)));
    page.notify(ToastRequest::new("Connection lost").kind("error").duration(Duration::ZERO));
    report(&mut page, "two toasts requested");
    page.advance(Duration::from_secs(1));
    println!("live toasts after one second: {}", page.toasts().len());

    page.click(ids.password_toggle);
    println!(
        "password input type: {}",
        page.document().attribute(ids.password_input, "type").unwrap_or("?")
    );

    page.detach_all();
    println!(
        "after detach: {} listeners, {} timers",
        page.listeners().len(),
        page.scheduler().pending()
    );
}
