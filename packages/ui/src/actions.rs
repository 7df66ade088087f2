//! User-facing flows: call the session store, report the outcome on the alert
//! channel, and say where to go next.
//!
//! Every flow catches its own error and turns it into an error alert. A flow
//! returns `Some(destination)` on success and `None` when the view should stay
//! where it is.

use api::{AccountsApi, User};

use crate::alert::AlertChannel;
use crate::guard::{self, Destination};
use crate::session::SessionStore;
use crate::validation::{Field, FormMode, FormValues};

pub async fn register<A: AccountsApi>(
    session: &SessionStore<A>,
    alerts: &AlertChannel,
    values: &FormValues,
) -> Option<Destination> {
    match session.register(&values.to_new_user()).await {
        Ok(()) => {
            tracing::info!("Registered {}", values.get(Field::Username));
            alerts.success("Registration successful", true);
            Some(Destination::Login { return_url: None })
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            alerts.error(e.to_string());
            None
        }
    }
}

pub async fn login<A: AccountsApi>(
    session: &SessionStore<A>,
    alerts: &AlertChannel,
    values: &FormValues,
    return_url: Option<&str>,
) -> Option<Destination> {
    alerts.clear();
    match session
        .login(values.get(Field::Username), values.get(Field::Password))
        .await
    {
        Ok(_) => Some(guard::after_login(return_url)),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            alerts.error(e.to_string());
            None
        }
    }
}

/// Add or edit a user from the shared add/edit form.
pub async fn save_user<A: AccountsApi>(
    session: &SessionStore<A>,
    alerts: &AlertChannel,
    mode: &FormMode,
    values: &FormValues,
) -> Option<Destination> {
    alerts.clear();
    let result = match mode {
        FormMode::Create => session
            .register(&values.to_new_user())
            .await
            .map(|()| "User added"),
        FormMode::Edit { id } => session
            .update(id, &values.to_update())
            .await
            .map(|()| "User updated"),
    };
    match result {
        Ok(message) => {
            alerts.success(message, true);
            Some(Destination::Users)
        }
        Err(e) => {
            tracing::error!("Saving user failed: {}", e);
            alerts.error(e.to_string());
            None
        }
    }
}

pub async fn delete_user<A: AccountsApi>(
    session: &SessionStore<A>,
    alerts: &AlertChannel,
    id: &str,
) -> bool {
    match session.delete(id).await {
        Ok(()) => {
            alerts.info("User deleted");
            true
        }
        Err(e) => {
            tracing::error!("Deleting user {} failed: {}", id, e);
            alerts.error(e.to_string());
            false
        }
    }
}

pub async fn load_users<A: AccountsApi>(
    session: &SessionStore<A>,
    alerts: &AlertChannel,
) -> Option<Vec<User>> {
    match session.get_all().await {
        Ok(users) => Some(users),
        Err(e) => {
            alerts.error(e.to_string());
            None
        }
    }
}

pub async fn load_user<A: AccountsApi>(
    session: &SessionStore<A>,
    alerts: &AlertChannel,
    id: &str,
) -> Option<User> {
    match session.get_by_id(id).await {
        Ok(user) => Some(user),
        Err(e) => {
            alerts.error(e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use api::{ApiError, MemoryAccounts, NewUser};
    use store::MemoryStorage;

    use crate::alert::AlertKind;
    use crate::form::{submit, FormPhase, FormState, Liveness, SubmitOutcome};
    use crate::guard::GuardDecision;
    use crate::validation::{login_schema, register_schema, user_schema};

    struct Harness {
        api: MemoryAccounts,
        session: SessionStore<MemoryAccounts>,
        alerts: AlertChannel,
    }

    fn harness() -> Harness {
        let api = MemoryAccounts::new();
        let session = SessionStore::new(api.clone(), Rc::new(MemoryStorage::new()), "user");
        Harness {
            api,
            session,
            alerts: AlertChannel::new(),
        }
    }

    fn person(username: &str, password: &str) -> FormValues {
        FormValues::new()
            .with(Field::FirstName, "A")
            .with(Field::LastName, "B")
            .with(Field::Username, username)
            .with(Field::Password, password)
    }

    async fn signed_in(h: &Harness) -> String {
        let id = h.api.seed(NewUser {
            first_name: "Admin".into(),
            last_name: "User".into(),
            username: "admin".into(),
            password: "admin123".into(),
        });
        h.session.login("admin", "admin123").await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_empty_required_fields_make_no_network_call() {
        let h = harness();
        let form = Rc::new(RefCell::new(FormState::new(
            user_schema(&FormMode::Create),
            FormValues::new(),
        )));

        let outcome = submit(form.clone(), &Liveness::new(), |values| {
            let (session, alerts) = (h.session.clone(), h.alerts.clone());
            async move { save_user(&session, &alerts, &FormMode::Create, &values).await }
        })
        .await;

        assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
        assert_eq!(h.api.call_count(), 0);
        assert!(h.alerts.current().is_none());
        for field in [Field::FirstName, Field::LastName, Field::Username, Field::Password] {
            assert!(form.borrow().error(field).is_some());
        }
    }

    #[tokio::test]
    async fn test_register_success_persists_alert_and_goes_to_login() {
        let h = harness();
        let notifications = Rc::new(RefCell::new(Vec::new()));
        let n = notifications.clone();
        let _sub = h.alerts.subscribe(move |a| n.borrow_mut().push(a.clone()));

        let destination = register(&h.session, &h.alerts, &person("ab", "123456")).await;

        assert_eq!(destination, Some(Destination::Login { return_url: None }));
        let shown: Vec<_> = notifications.borrow().iter().flatten().cloned().collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, AlertKind::Success);
        assert_eq!(shown[0].message, "Registration successful");
        assert!(shown[0].keep_after_route_change);
    }

    #[tokio::test]
    async fn test_register_duplicate_username_alerts_server_message() {
        let h = harness();
        register(&h.session, &h.alerts, &person("ab", "123456")).await;

        let destination = register(&h.session, &h.alerts, &person("ab", "654321")).await;
        assert!(destination.is_none());
        let alert = h.alerts.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Username \"ab\" is already taken");
    }

    #[tokio::test]
    async fn test_failed_login_stays_put() {
        let h = harness();
        signed_in(&h).await;
        h.session.logout();

        let form = Rc::new(RefCell::new(FormState::new(
            login_schema(),
            FormValues::new()
                .with(Field::Username, "admin")
                .with(Field::Password, "wrong"),
        )));
        let outcome = submit(form.clone(), &Liveness::new(), |values| {
            let (session, alerts) = (h.session.clone(), h.alerts.clone());
            async move { login(&session, &alerts, &values, Some("/users")).await }
        })
        .await;

        assert_eq!(outcome, SubmitOutcome::Settled(None));
        assert_eq!(form.borrow().phase(), FormPhase::SettledError);
        assert!(h.session.current().is_none());
        assert_eq!(h.alerts.current().unwrap().kind, AlertKind::Error);
    }

    #[tokio::test]
    async fn test_login_follows_return_url() {
        let h = harness();
        signed_in(&h).await;
        h.session.logout();

        let values = FormValues::new()
            .with(Field::Username, "admin")
            .with(Field::Password, "admin123");
        let destination = login(&h.session, &h.alerts, &values, Some("/users/add")).await;
        assert_eq!(destination, Some(Destination::Path("/users/add".into())));
        assert!(h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_edit_with_blank_password_omits_it() {
        let h = harness();
        signed_in(&h).await;
        let id = h.api.seed(NewUser {
            first_name: "Old".into(),
            last_name: "Name".into(),
            username: "old".into(),
            password: "original".into(),
        });
        let mode = FormMode::Edit { id: id.clone() };
        let form = Rc::new(RefCell::new(FormState::new(
            user_schema(&mode),
            FormValues::from_user(&h.api.user(&id).unwrap()),
        )));
        form.borrow_mut().set_value(Field::FirstName, "New");

        let outcome = submit(form.clone(), &Liveness::new(), |values| {
            let (session, alerts, mode) = (h.session.clone(), h.alerts.clone(), mode.clone());
            async move { save_user(&session, &alerts, &mode, &values).await }
        })
        .await;

        assert_eq!(outcome, SubmitOutcome::Settled(Some(Destination::Users)));
        assert!(h.api.last_update().unwrap().password.is_none());
        assert_eq!(h.api.password_of(&id).as_deref(), Some("original"));
        assert_eq!(h.api.user(&id).unwrap().first_name, "New");
        let alert = h.alerts.current().unwrap();
        assert_eq!(alert.message, "User updated");
        assert!(alert.keep_after_route_change);
    }

    #[tokio::test]
    async fn test_edit_with_short_password_is_blocked() {
        let h = harness();
        let mode = FormMode::Edit { id: "1".into() };
        let form = Rc::new(RefCell::new(FormState::new(
            user_schema(&mode),
            person("ab", "abc"),
        )));

        let outcome = submit(form.clone(), &Liveness::new(), |values| {
            let (session, alerts, mode) = (h.session.clone(), h.alerts.clone(), mode.clone());
            async move { save_user(&session, &alerts, &mode, &values).await }
        })
        .await;

        assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
        assert_eq!(
            form.borrow().error(Field::Password),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(h.api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_user_clears_stale_alert_first() {
        let h = harness();
        signed_in(&h).await;
        h.alerts.error("old problem");

        let destination = save_user(&h.session, &h.alerts, &FormMode::Create, &person("new", "123456")).await;
        assert_eq!(destination, Some(Destination::Users));
        assert_eq!(h.alerts.current().unwrap().message, "User added");
    }

    #[tokio::test]
    async fn test_server_error_message_is_verbatim() {
        let h = harness();
        signed_in(&h).await;
        h.api.fail_next(ApiError::Server {
            status: 500,
            message: "Database is on fire".into(),
        });

        assert!(load_users(&h.session, &h.alerts).await.is_none());
        assert_eq!(h.alerts.current().unwrap().message, "Database is on fire");
        assert!(h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_missing_user_is_reported() {
        let h = harness();
        signed_in(&h).await;
        assert!(load_user(&h.session, &h.alerts, "999").await.is_none());
        assert_eq!(h.alerts.current().unwrap().message, "User not found");
    }

    #[tokio::test]
    async fn test_logout_on_protected_page_redirects_to_login() {
        let h = harness();
        signed_in(&h).await;
        assert_eq!(crate::guard::check("/users", h.session.is_authenticated()), GuardDecision::Allow);

        h.session.logout();
        assert!(h.session.current().is_none());
        assert!(matches!(
            crate::guard::check("/users", h.session.is_authenticated()),
            GuardDecision::Redirect(Destination::Login { .. })
        ));
    }

    #[tokio::test]
    async fn test_deleting_yourself_ends_the_session() {
        let h = harness();
        let id = signed_in(&h).await;
        assert!(delete_user(&h.session, &h.alerts, &id).await);
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_delete_reports_info() {
        let h = harness();
        signed_in(&h).await;
        let other = h.api.seed(NewUser {
            username: "other".into(),
            ..NewUser::default()
        });

        assert!(delete_user(&h.session, &h.alerts, &other).await);
        let alert = h.alerts.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Info);
        assert_eq!(alert.message, "User deleted");
        assert!(!alert.keep_after_route_change);
        assert!(h.api.user(&other).is_none());
        assert!(h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_expired_token_on_delete_alerts_and_logs_out() {
        let h = harness();
        signed_in(&h).await;
        let other = h.api.seed(NewUser {
            username: "other".into(),
            ..NewUser::default()
        });
        h.api.expire_tokens();

        assert!(!delete_user(&h.session, &h.alerts, &other).await);
        assert!(!h.session.is_authenticated());
        assert_eq!(h.alerts.current().unwrap().kind, AlertKind::Error);
    }

    #[test]
    fn test_register_schema_matches_create_mode() {
        assert_eq!(register_schema(), user_schema(&FormMode::Create));
    }
}
