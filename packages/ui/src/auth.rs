//! Console context and hooks for the UI.
//!
//! [`ConsoleProvider`] builds the [`Console`] (session store + alert channel)
//! once, provides it as context, and mirrors both observables into signals so
//! components re-render when the session or the current alert changes. The
//! subscriptions backing those signals are released when the provider unmounts.

use std::cell::RefCell;
use std::rc::Rc;

use api::{HttpAccounts, Session};
use dioxus::prelude::*;
use store::ConsoleConfig;

use crate::alert::{Alert, AlertChannel};
use crate::form::{FormAccess, FormState, Liveness};
use crate::observable::Subscription;
use crate::session::SessionStore;

/// Everything a view needs to talk to the outside world.
#[derive(Clone)]
pub struct Console {
    pub session: SessionStore<HttpAccounts>,
    pub alerts: AlertChannel,
}

impl Console {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        tracing::info!("Accounts API at {}", config.api.base_url);
        let api = HttpAccounts::new(config.api.base_url.clone());
        Self {
            session: SessionStore::new(
                api,
                store::platform_storage(),
                config.storage.session_key.clone(),
            ),
            alerts: AlertChannel::new(),
        }
    }
}

/// The shared [`Console`].
pub fn use_console() -> Console {
    use_context::<Console>()
}

/// The current session; updates on login, logout and self-edits.
pub fn use_session() -> Signal<Option<Session>> {
    use_context::<Signal<Option<Session>>>()
}

/// The alert currently on screen, if any.
pub fn use_alert() -> Signal<Option<Alert>> {
    use_context::<Signal<Option<Alert>>>()
}

/// A [`Liveness`] flag that ends when the calling component unmounts.
pub fn use_liveness() -> Liveness {
    let liveness = use_hook(Liveness::new);
    let on_drop = liveness.clone();
    use_drop(move || on_drop.end());
    liveness
}

impl FormAccess for Signal<FormState> {
    fn with_form<R>(&mut self, f: impl FnOnce(&mut FormState) -> R) -> R {
        f(&mut self.write())
    }
}

/// Provider component that owns the console state.
/// Wrap your app with this component.
#[component]
pub fn ConsoleProvider(config: ConsoleConfig, children: Element) -> Element {
    let console = use_hook(|| Console::from_config(&config));
    use_context_provider(|| console.clone());

    let session = use_context_provider(|| Signal::new(console.session.current()));
    let alert = use_context_provider(|| Signal::new(console.alerts.current()));

    let subscriptions = use_hook(|| {
        let on_session = console.session.subscribe(move |value| {
            let mut session = session;
            session.set(value.clone());
        });
        let on_alert = console.alerts.subscribe(move |value| {
            let mut alert = alert;
            alert.set(value.clone());
        });
        Rc::new(RefCell::new(vec![on_session, on_alert]))
    });
    use_drop(move || {
        let released: Vec<Subscription> = subscriptions.borrow_mut().drain(..).collect();
        tracing::debug!("Releasing {} console subscriptions", released.len());
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user. The route guard takes it from there.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let console = use_console();

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| console.session.logout(),
            "{label}"
        }
    }
}
