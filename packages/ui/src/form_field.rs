use dioxus::prelude::*;

use crate::form::FormState;
use crate::validation::Field;

/// Labelled input bound to one form field, with its validation message.
#[component]
pub fn TextField(
    field: Field,
    value: String,
    error: Option<String>,
    #[props(default = false)] disabled: bool,
    #[props(default = false)] required: bool,
    // Extra text next to the label, e.g. "Leave blank to keep the same password".
    hint: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    let class = if error.is_some() { "form-input invalid" } else { "form-input" };

    rsx! {
        div {
            class: "form-group",
            label {
                r#for: field.name(),
                "{field.label()}"
                if required {
                    span { class: "form-required", " *" }
                }
                if let Some(hint) = hint {
                    em { class: "form-hint", " ({hint})" }
                }
            }
            input {
                id: field.name(),
                name: field.name(),
                class: class,
                r#type: field.input_type(),
                value: value,
                disabled: disabled,
                oninput: move |evt: FormEvent| oninput.call(evt.value()),
            }
            if let Some(message) = error {
                p { class: "form-error", "{message}" }
            }
        }
    }
}

/// Inline busy indicator for submit buttons.
#[component]
pub fn Spinner() -> Element {
    rsx! {
        span { class: "spinner", aria_hidden: "true" }
    }
}

/// Every field of `form`'s schema, in schema order. Inputs are disabled while
/// the form is submitting.
#[component]
pub fn FormFields(form: Signal<FormState>, password_hint: Option<String>) -> Element {
    let state = form();
    let busy = state.is_submitting();
    let fields: Vec<Field> = state.schema().fields().collect();

    rsx! {
        for field in fields {
            TextField {
                key: "{field.name()}",
                field: field,
                value: state.value(field).to_string(),
                error: state.error(field).map(str::to_string),
                disabled: busy,
                required: state.schema().is_required(field),
                hint: if field == Field::Password { password_hint.clone() } else { None },
                oninput: move |value: String| {
                    let mut form = form;
                    form.write().set_value(field, value);
                },
            }
        }
    }
}
