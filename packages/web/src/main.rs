use dioxus::prelude::*;

use store::ConsoleConfig;
use ui::guard::{self, Destination, GuardDecision};
use ui::{use_console, use_session, AlertBanner, ConsoleProvider, Navbar};
use views::{Home, Login, Register, UserAdd, UserEdit, Users};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(AppShell)]
        #[route("/")]
        Home {},
        #[route("/account/login?:return_url")]
        Login { return_url: String },
        #[route("/account/register")]
        Register {},
        #[route("/users")]
        Users {},
        #[route("/users/add")]
        UserAdd {},
        #[route("/users/edit/:id")]
        UserEdit { id: String },
}

impl From<Destination> for Route {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Home => Route::Home {},
            Destination::Login { return_url } => Route::Login {
                return_url: return_url.unwrap_or_default(),
            },
            Destination::Users => Route::Users {},
            Destination::Path(path) => path.parse::<Route>().unwrap_or(Route::Home {}),
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ConsoleProvider {
            config: ConsoleConfig::load(),
            Router::<Route> {}
        }
    }
}

/// Shared layout: route guard, nav bar and alert banner around every page.
#[component]
fn AppShell() -> Element {
    let route = use_route::<Route>();
    let session = use_session();
    let console = use_console();
    let nav = use_navigator();
    let path = route.to_string();

    use_effect(use_reactive((&path,), move |(path,)| {
        tracing::debug!("Navigated to {}", path);
        console.alerts.route_changed();
    }));

    if let GuardDecision::Redirect(destination) = guard::check(&path, session().is_some()) {
        let target = Route::from(destination);
        tracing::debug!("Guard redirect from {} to {}", path, target);
        nav.replace(target);
        return rsx! {};
    }

    rsx! {
        Navbar {
            Link { to: Route::Home {}, class: "nav-link", active_class: "active", "Home" }
            Link { to: Route::Users {}, class: "nav-link", active_class: "active", "Users" }
        }
        main {
            class: "app-container",
            AlertBanner {}
            Outlet::<Route> {}
        }
    }
}
