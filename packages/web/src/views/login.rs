//! Login page view with username/password form.

use dioxus::prelude::*;
use ui::validation::login_schema;
use ui::{
    actions, submit, use_console, use_liveness, FormFields, FormState, FormValues, Spinner,
    SubmitOutcome,
};

use crate::Route;

/// Login page component. `return_url` is where the guard found the user.
#[component]
pub fn Login(return_url: String) -> Element {
    let console = use_console();
    let liveness = use_liveness();
    let nav = use_navigator();
    let form = use_signal(|| FormState::new(login_schema(), FormValues::new()));

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let console = console.clone();
        let liveness = liveness.clone();
        let return_url = return_url.clone();
        spawn(async move {
            let outcome = submit(form, &liveness, |values| async move {
                let return_url = (!return_url.is_empty()).then_some(return_url.as_str());
                actions::login(&console.session, &console.alerts, &values, return_url).await
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
            h2 { class: "card-header", "Login" }
            form {
                class: "card-body",
                onsubmit: handle_login,

                FormFields { form: form }

                div {
                    class: "form-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: busy,
                        if busy { Spinner {} }
                        "Login"
                    }
                    Link { to: Route::Register {}, class: "btn btn-link", "Register" }
                }
            }
        }
    }
}
