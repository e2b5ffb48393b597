//! Canonical markup for each widget.

use crate::{Fixture, Markup};

/// A dropdown with `items` links, plus an `outside` button after it.
///
/// Names: `root`, `trigger`, `menu`, `item-<i>`, `outside`.
pub fn dropdown_fixture(items: usize) -> Fixture {
    Markup::new()
        .body(|body| {
            body.child("div", |root| {
                root.name("root").controller("dropdown").class("relative");
                root.child("button", |b| {
                    b.name("trigger")
                        .target("dropdown", "trigger")
                        .action("click->dropdown#toggle")
                        .text("Menu");
                });
                root.child("div", |menu| {
                    menu.name("menu").target("dropdown", "menu").class("hidden absolute");
                    menu.children("a", items, |i, item| {
                        item.name(format!("item-{i}")).attr("href", &format!("#item-{i}"));
                    });
                });
            });
            body.child("button", |b| {
                b.name("outside").text("Elsewhere");
            });
        })
        .build()
}

/// An inline modal whose dialog holds `fields` buttons and a close button.
///
/// Names: `before` (a button outside the modal), `root`, `opener`,
/// `container`, `backdrop`, `dialog`, `field-<i>`, `close`.
pub fn modal_fixture(fields: usize) -> Fixture {
    Markup::new()
        .body(|body| {
            body.child("button", |b| {
                b.name("before");
            });
            body.child("div", |root| {
                root.name("root").controller("modal");
                root.child("button", |b| {
                    b.name("opener").action("click->modal#open").text("Open");
                });
                root.child("div", |container| {
                    container.name("container").target("modal", "container").class("hidden");
                    container.child("div", |backdrop| {
                        backdrop
                            .name("backdrop")
                            .target("modal", "backdrop")
                            .action("click->modal#closeOnBackdrop");
                    });
                    container.child("div", |dialog| {
                        dialog
                            .name("dialog")
                            .target("modal", "dialog")
                            .attr("role", "dialog")
                            .attr("aria-modal", "true");
                        dialog.children("button", fields, |i, b| {
                            b.name(format!("field-{i}"));
                        });
                        dialog.child("button", |b| {
                            b.name("close").action("click->modal#close").text("Close");
                        });
                    });
                });
            });
        })
        .build()
}

/// A trigger driving a dialog rendered elsewhere through
/// `data-modal-remote-value="#remote-modal"`.
///
/// Names: `trigger`, `container`, `backdrop`, `dialog`, `ok`.
pub fn remote_modal_fixture() -> Fixture {
    Markup::new()
        .body(|body| {
            body.child("button", |b| {
                b.name("trigger")
                    .controller("modal")
                    .option("modal", "remote", "#remote-modal")
                    .action("click->modal#open");
            });
            body.child("div", |container| {
                container.name("container").attr("id", "remote-modal").class("hidden");
                container.child("div", |backdrop| {
                    backdrop.name("backdrop").target("modal", "backdrop");
                });
                container.child("div", |dialog| {
                    dialog.name("dialog").target("modal", "dialog");
                    dialog.child("button", |b| {
                        b.name("ok");
                    });
                });
            });
        })
        .build()
}

/// Two independent inline modals.
///
/// Names: `outer`, `outer-container`, `outer-button`, and the same for `inner`.
pub fn nested_modals_fixture() -> Fixture {
    Markup::new()
        .body(|body| {
            for prefix in ["outer", "inner"] {
                body.child("div", |root| {
                    root.name(prefix).controller("modal");
                    root.child("div", |container| {
                        container
                            .name(format!("{prefix}-container"))
                            .target("modal", "container")
                            .class("hidden");
                        container.child("div", |dialog| {
                            dialog.target("modal", "dialog");
                            dialog.child("button", |b| {
                                b.name(format!("{prefix}-button"));
                            });
                        });
                    });
                });
            }
        })
        .build()
}

/// A toast manager with a `show` trigger.
///
/// With `declared_container` the root doubles as the container target.
/// Names: `root`, `trigger`.
pub fn toast_fixture(declared_container: bool) -> Fixture {
    Markup::new()
        .body(|body| {
            body.child("div", |root| {
                root.name("root").controller("toast");
                if declared_container {
                    root.target("toast", "container");
                }
                root.child("button", |b| {
                    b.name("trigger")
                        .action("click->toast#show")
                        .attr("data-toast-message", "Saved")
                        .attr("data-toast-type", "success");
                });
            });
        })
        .build()
}

/// A password input with a visibility toggle.
///
/// Names: `root`, `input`, `toggle`, `icon`.
pub fn password_fixture() -> Fixture {
    Markup::new()
        .body(|body| {
            body.child("div", |root| {
                root.name("root").controller("password-visibility");
                root.child("input", |input| {
                    input
                        .name("input")
                        .attr("type", "password")
                        .target("password-visibility", "input");
                });
                root.child("button", |b| {
                    b.name("toggle")
                        .attr("type", "button")
                        .action("click->password-visibility#toggle");
                    b.child("span", |icon| {
                        icon.name("icon").target("password-visibility", "icon").text("👁");
                    });
                });
            });
        })
        .build()
}
