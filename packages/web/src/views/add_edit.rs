//! Shared add/edit user page.

use dioxus::prelude::*;
use ui::validation::user_schema;
use ui::{
    actions, submit, use_console, use_liveness, FormFields, FormMode, FormState, FormValues,
    Spinner, SubmitOutcome,
};

use crate::Route;

#[component]
pub fn UserAdd() -> Element {
    rsx! {
        AddEdit { mode: FormMode::Create }
    }
}

#[component]
pub fn UserEdit(id: String) -> Element {
    let console = use_console();
    // Track the id in a signal so the loader re-runs when the route param changes.
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }
    let mut loaded = use_signal(|| Option::<FormValues>::None);

    let _loader = use_resource(move || {
        let id = id_signal();
        let console = console.clone();
        async move {
            loaded.set(None);
            if let Some(user) = actions::load_user(&console.session, &console.alerts, &id).await {
                loaded.set(Some(FormValues::from_user(&user)));
            }
        }
    });

    match loaded() {
        Some(values) => rsx! {
            AddEdit {
                key: "{id}",
                mode: FormMode::Edit { id: id.clone() },
                defaults: values,
            }
        },
        None => rsx! {
            div { class: "card center", Spinner {} }
        },
    }
}

/// Form shared by the add and edit pages. `defaults` is what Reset restores.
#[component]
fn AddEdit(mode: FormMode, #[props(default)] defaults: FormValues) -> Element {
    let console = use_console();
    let liveness = use_liveness();
    let nav = use_navigator();
    let schema_mode = mode.clone();
    let mut form = use_signal(move || FormState::new(user_schema(&schema_mode), defaults));

    let title = if mode.is_edit() { "Edit User" } else { "Add User" };
    let password_hint = mode
        .is_edit()
        .then(|| "Leave blank to keep the same password".to_string());

    let handle_save = move |evt: FormEvent| {
        evt.prevent_default();
        let console = console.clone();
        let liveness = liveness.clone();
        let mode = mode.clone();
        spawn(async move {
            let outcome = submit(form, &liveness, |values| async move {
                actions::save_user(&console.session, &console.alerts, &mode, &values).await
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
            h1 { class: "card-header", "{title}" }
            form {
                class: "card-body",
                onsubmit: handle_save,

                FormFields { form: form, password_hint: password_hint }

                div {
                    class: "form-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: busy,
                        if busy { Spinner {} }
                        "Save"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| {
                            form.write().reset();
                        },
                        "Reset"
                    }
                    Link { to: Route::Users {}, class: "btn btn-link", "Cancel" }
                }
            }
        }
    }
}
