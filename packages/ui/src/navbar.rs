use dioxus::prelude::*;

use crate::auth::{use_session, LogoutButton};

/// Top navigation, shown only while someone is signed in. The links are
/// supplied by the app, which owns the route table.
#[component]
pub fn Navbar(children: Element) -> Element {
    let session = use_session();

    if session().is_none() {
        return rsx! {};
    }

    rsx! {
        nav {
            class: "navbar",
            div {
                class: "navbar-links",
                {children}
            }
            LogoutButton { class: "navbar-logout" }
        }
    }
}
