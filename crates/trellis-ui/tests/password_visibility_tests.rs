use trellis_core::Config;
use trellis_test_utils::password_fixture;
use trellis_ui::Page;
use trellis_ui::password_visibility::{HIDDEN_ICON, SHOWN_ICON};

#[test]
fn test_toggle_reveals_and_hides() {
    let fixture = password_fixture();
    let mut page = Page::new(fixture.doc.clone(), Config::default());
    page.connect();
    let (input, icon) = (fixture.id("input"), fixture.id("icon"));

    page.click(fixture.id("toggle"));
    assert_eq!(page.document().attribute(input, "type"), Some("text"));
    assert_eq!(page.document().text(icon), Some(SHOWN_ICON));
    assert!(page.password_visibility(fixture.id("root")).unwrap().is_revealed(page.context()));

    // clicks on the icon bubble to the button
    page.click(icon);
    assert_eq!(page.document().attribute(input, "type"), Some("password"));
    assert_eq!(page.document().text(icon), Some(HIDDEN_ICON));
}

#[test]
fn test_toggle_without_input_is_noop() {
    let fixture = password_fixture();
    let mut doc = fixture.doc.clone();
    doc.remove_attribute(fixture.id("input"), "data-password-visibility-target");
    let mut page = Page::new(doc, Config::default());
    page.connect();

    page.click(fixture.id("toggle"));
    assert_eq!(page.document().attribute(fixture.id("input"), "type"), Some("password"));
    assert_eq!(page.document().text(fixture.id("icon")), Some(HIDDEN_ICON));
}
