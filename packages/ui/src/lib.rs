//! This crate contains the shared state and UI for the console: the session
//! store, the alert channel, form validation and submission, the route guard,
//! and the components built on them.

pub mod actions;
pub mod alert;
pub mod form;
pub mod guard;
pub mod observable;
pub mod session;
pub mod validation;

mod auth;
pub use auth::{
    use_alert, use_console, use_liveness, use_session, Console, ConsoleProvider, LogoutButton,
};

mod navbar;
pub use navbar::Navbar;

mod alert_banner;
pub use alert_banner::AlertBanner;

mod form_field;
pub use form_field::{FormFields, Spinner, TextField};

pub use alert::{Alert, AlertChannel, AlertKind};
pub use form::{submit, FormPhase, FormState, Liveness, SubmitOutcome};
pub use guard::{Destination, GuardDecision};
pub use session::SessionStore;
pub use validation::{Field, FormMode, FormValues};
