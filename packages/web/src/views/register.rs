//! Registration page view.

use dioxus::prelude::*;
use ui::validation::register_schema;
use ui::{
    actions, submit, use_console, use_liveness, FormFields, FormState, FormValues, Spinner,
    SubmitOutcome,
};

use crate::Route;

/// Register page component.
#[component]
pub fn Register() -> Element {
    let console = use_console();
    let liveness = use_liveness();
    let nav = use_navigator();
    let form = use_signal(|| FormState::new(register_schema(), FormValues::new()));

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let console = console.clone();
        let liveness = liveness.clone();
        spawn(async move {
            let outcome = submit(form, &liveness, |values| async move {
                actions::register(&console.session, &console.alerts, &values).await
            })
            .await;
            if let SubmitOutcome::Settled(Some(destination)) = outcome {
                nav.push(Route::from(destination));
            }
        });
    };

    let busy = form.read().is_submitting();

    rsx! {
        div {
            class: "card",
            h2 { class: "card-header", "Register" }
            form {
                class: "card-body",
                onsubmit: handle_register,

                FormFields { form: form }

                div {
                    class: "form-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: busy,
                        if busy { Spinner {} }
                        "Register"
                    }
                    Link {
                        to: Route::Login { return_url: String::new() },
                        class: "btn btn-link",
                        "Cancel"
                    }
                }
            }
        }
    }
}
