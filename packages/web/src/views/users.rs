use std::collections::HashSet;

use api::User;
use dioxus::prelude::*;
use ui::{actions, use_console, Spinner};

use crate::Route;

#[component]
pub fn Users() -> Element {
    let console = use_console();
    // None while the first load is in flight.
    let mut users = use_signal(|| Option::<Vec<User>>::None);
    let mut deleting = use_signal(HashSet::<String>::new);

    let loader_console = console.clone();
    let _loader = use_resource(move || {
        let console = loader_console.clone();
        async move {
            let loaded = actions::load_users(&console.session, &console.alerts).await;
            users.set(Some(loaded.unwrap_or_default()));
        }
    });

    let handle_delete = move |id: String| {
        if deleting.read().contains(&id) {
            return;
        }
        deleting.write().insert(id.clone());
        let console = console.clone();
        spawn(async move {
            let deleted = actions::delete_user(&console.session, &console.alerts, &id).await;
            deleting.write().remove(&id);
            if deleted {
                if let Some(list) = users.write().as_mut() {
                    list.retain(|u| u.id != id);
                }
            }
        });
    };

    rsx! {
        div {
            class: "card",
            h1 { "Users" }
            Link { to: Route::UserAdd {}, class: "btn btn-success", "Add User" }
            table {
                class: "users-table",
                thead {
                    tr {
                        th { "First Name" }
                        th { "Last Name" }
                        th { "Username" }
                        th {}
                    }
                }
                tbody {
                    match users() {
                        None => rsx! {
                            tr {
                                td { colspan: "4", class: "center", Spinner {} }
                            }
                        },
                        Some(list) if list.is_empty() => rsx! {
                            tr {
                                td { colspan: "4", class: "center", "No users" }
                            }
                        },
                        Some(list) => rsx! {
                            for user in list {
                                UserRow {
                                    key: "{user.id}",
                                    deleting: deleting.read().contains(&user.id),
                                    user: user,
                                    on_delete: handle_delete.clone(),
                                }
                            }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn UserRow(user: User, deleting: bool, on_delete: EventHandler<String>) -> Element {
    let id = user.id.clone();

    rsx! {
        tr {
            td { "{user.first_name}" }
            td { "{user.last_name}" }
            td { "{user.username}" }
            td {
                class: "row-actions",
                Link {
                    to: Route::UserEdit { id: user.id.clone() },
                    class: "btn btn-sm btn-primary",
                    "Edit"
                }
                button {
                    class: "btn btn-sm btn-danger",
                    disabled: deleting,
                    onclick: move |_| on_delete.call(id.clone()),
                    if deleting {
                        Spinner {}
                    } else {
                        "Delete"
                    }
                }
            }
        }
    }
}
