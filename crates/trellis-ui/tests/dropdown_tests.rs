//! Dropdown behavior driven through a page: clicks, keys and frames.

use std::time::Duration;

use trellis_core::Config;
use trellis_dom::{Key, Modifiers};
use trellis_test_utils::{Fixture, dropdown_fixture};
use trellis_ui::{DropdownState, Page};

const FRAME: Duration = Duration::from_millis(16);

fn page_for(fixture: &Fixture) -> Page {
    let mut page = Page::new(fixture.doc.clone(), Config::default());
    page.connect();
    page
}

fn open(page: &mut Page, fixture: &Fixture) {
    page.click(fixture.id("trigger"));
    page.advance(FRAME);
}

#[test]
fn test_open_focuses_first_item_next_frame() {
    let fixture = dropdown_fixture(3);
    let mut page = page_for(&fixture);

    page.click(fixture.id("trigger"));
    assert!(page.dropdown(fixture.id("root")).unwrap().is_open());
    assert_eq!(page.document().active_element(), Some(fixture.id("trigger")));
    assert_eq!(page.document().attribute(fixture.id("trigger"), "aria-expanded"), Some("true"));

    page.advance(FRAME);
    assert_eq!(page.document().active_element(), Some(fixture.id("item-0")));
}

#[test]
fn test_arrow_keys_wrap_around() {
    let fixture = dropdown_fixture(3);
    let mut page = page_for(&fixture);
    open(&mut page, &fixture);

    let event = page.press(Key::ArrowUp);
    assert!(event.default_prevented());
    assert_eq!(page.document().active_element(), Some(fixture.id("item-2")));

    page.press(Key::ArrowDown);
    assert_eq!(page.document().active_element(), Some(fixture.id("item-0")));

    page.press(Key::ArrowDown);
    page.press(Key::ArrowDown);
    assert_eq!(page.document().active_element(), Some(fixture.id("item-2")));
    page.press(Key::ArrowDown);
    assert_eq!(page.document().active_element(), Some(fixture.id("item-0")));
}

#[test]
fn test_disabled_items_are_skipped() {
    let fixture = dropdown_fixture(3);
    let mut page = page_for(&fixture);
    page.document_mut().set_attribute(fixture.id("item-1"), "disabled", "");
    open(&mut page, &fixture);

    page.press(Key::ArrowDown);
    assert_eq!(page.document().active_element(), Some(fixture.id("item-2")));
}

#[test]
fn test_toggle_twice_restores_trigger() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);
    let trigger = fixture.id("trigger");

    page.click(trigger);
    page.advance(FRAME);
    let event = page.click(trigger);

    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
    assert_eq!(page.dropdown(fixture.id("root")).unwrap().state(), DropdownState::Closed);
    assert_eq!(page.document().active_element(), Some(trigger));
    assert_eq!(page.document().attribute(trigger, "aria-expanded"), Some("false"));
    assert!(page.document().has_class(fixture.id("menu"), "hidden"));
    assert!(page.listeners().is_empty());
    assert_eq!(page.scheduler().pending(), 0);
}

#[test]
fn test_toggle_before_frame_cancels_focus() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);

    page.click(fixture.id("trigger"));
    page.click(fixture.id("trigger"));
    page.advance(FRAME * 4);
    assert_eq!(page.document().active_element(), Some(fixture.id("trigger")));
}

#[test]
fn test_outside_click_closes() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);
    open(&mut page, &fixture);

    page.click(fixture.id("item-1"));
    assert!(page.dropdown(fixture.id("root")).unwrap().is_open());

    page.click(fixture.id("outside"));
    assert!(!page.dropdown(fixture.id("root")).unwrap().is_open());
    assert!(page.listeners().is_empty());
}

#[test]
fn test_escape_closes() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);
    open(&mut page, &fixture);

    let event = page.press(Key::Escape);
    assert!(event.default_prevented());
    assert!(!page.dropdown(fixture.id("root")).unwrap().is_open());
    assert_eq!(page.document().active_element(), Some(fixture.id("trigger")));
}

#[test]
fn test_tab_closes_and_moves_on() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);
    open(&mut page, &fixture);

    page.key_down(Key::Tab, Modifiers::empty());
    assert!(!page.dropdown(fixture.id("root")).unwrap().is_open());
    assert_eq!(page.document().active_element(), Some(fixture.id("outside")));
}

#[test]
fn test_enter_closes_on_following_frame() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);
    open(&mut page, &fixture);
    page.drain_notifications();

    page.press(Key::Enter);
    assert!(page.dropdown(fixture.id("root")).unwrap().is_open());

    page.advance(FRAME);
    assert!(!page.dropdown(fixture.id("root")).unwrap().is_open());
    let names: Vec<_> = page.drain_notifications().into_iter().map(|n| n.name).collect();
    assert_eq!(names, ["dropdown:closed"]);
}

#[test]
fn test_close_on_select_disabled() {
    let fixture = dropdown_fixture(2);
    let mut doc = fixture.doc.clone();
    doc.set_attribute(fixture.id("root"), "data-dropdown-close-on-select-value", "false");
    doc.set_attribute(fixture.id("item-0"), "data-action", "click->dropdown#select");
    let mut page = Page::new(doc, Config::default());
    page.connect();
    open(&mut page, &fixture);

    page.press(Key::Space);
    page.advance(FRAME);
    assert!(page.dropdown(fixture.id("root")).unwrap().is_open());
}

#[test]
fn test_select_action_closes() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);
    page.document_mut()
        .set_attribute(fixture.id("item-1"), "data-action", "click->dropdown#select");
    open(&mut page, &fixture);

    page.click(fixture.id("item-1"));
    assert!(!page.dropdown(fixture.id("root")).unwrap().is_open());
    assert_eq!(page.document().active_element(), Some(fixture.id("trigger")));
}

#[test]
fn test_each_open_matched_by_one_closed() {
    let fixture = dropdown_fixture(2);
    let mut page = page_for(&fixture);

    for _ in 0..3 {
        open(&mut page, &fixture);
        page.press(Key::Enter);
        page.click(fixture.id("outside"));
        page.press(Key::Escape);
        page.advance(FRAME * 2);
    }
    assert_eq!(page.notification_count("dropdown:opened"), 3);
    assert_eq!(page.notification_count("dropdown:closed"), 3);
}

#[test]
fn test_top_end_placement() {
    let fixture = dropdown_fixture(1);
    let mut doc = fixture.doc.clone();
    doc.set_attribute(fixture.id("root"), "data-dropdown-placement-value", "top-end");
    let mut page = Page::new(doc, Config::default());
    page.connect();
    page.click(fixture.id("trigger"));

    let menu = fixture.id("menu");
    assert_eq!(page.document().class_name(menu), "absolute right-0 bottom-full mb-1");
}
