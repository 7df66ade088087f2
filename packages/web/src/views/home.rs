use dioxus::prelude::*;
use ui::use_session;

use crate::Route;

#[component]
pub fn Home() -> Element {
    let session = use_session();
    let first_name = session()
        .map(|s| s.user.first_name)
        .unwrap_or_default();

    rsx! {
        div {
            class: "card",
            h1 { "Hi {first_name}!" }
            p { "You're logged in." }
            p {
                Link { to: Route::Users {}, "Manage Users" }
            }
        }
    }
}
