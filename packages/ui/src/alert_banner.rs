use dioxus::prelude::*;

use crate::auth::{use_alert, use_console};

/// Renders the alert channel's current alert, with a close button.
#[component]
pub fn AlertBanner() -> Element {
    let alert = use_alert();
    let console = use_console();

    let Some(current) = alert() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: current.kind.css_class(),
            role: "alert",
            span { class: "alert-message", "{current.message}" }
            button {
                class: "alert-close",
                r#type: "button",
                aria_label: "Close",
                onclick: move |_| console.alerts.clear(),
                "×"
            }
        }
    }
}
