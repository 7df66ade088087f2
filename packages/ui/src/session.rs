//! # Session store
//!
//! [`SessionStore`] owns the one authenticated [`Session`] a client may have and
//! fronts every call to the accounts API.
//!
//! - The session is published on an [`Observable`]; the nav bar and the route
//!   guard subscribe to it.
//! - It is written to durable storage on login and on self-edits, cleared on
//!   logout, and read back exactly once in [`SessionStore::new`].
//! - Every API call carries the current bearer token. An
//!   [`ApiError::Auth`] from an authenticated call means the token is dead, so
//!   the store logs out before handing the error back.
//!
//! Storage failures are logged and otherwise ignored: losing the persisted copy
//! only costs a login after the next restart.

use std::rc::Rc;

use api::{AccountsApi, ApiError, NewUser, Session, User, UserUpdate};
use store::KeyValueStorage;

use crate::observable::{Observable, Subscription};

pub struct SessionStore<A> {
    api: Rc<A>,
    storage: Rc<dyn KeyValueStorage>,
    key: String,
    session: Observable<Option<Session>>,
}

impl<A> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            storage: self.storage.clone(),
            key: self.key.clone(),
            session: self.session.clone(),
        }
    }
}

impl<A: AccountsApi> SessionStore<A> {
    /// Build the store and rehydrate any session persisted under `key`.
    pub fn new(api: A, storage: Rc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let restored = match store::load_json::<Session, _>(storage.as_ref(), &key) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding stored session: {}", e);
                if let Err(e) = store::remove(storage.as_ref(), &key) {
                    tracing::warn!("Failed to remove stored session: {}", e);
                }
                None
            }
        };
        if let Some(session) = &restored {
            tracing::info!("Restored session for {}", session.user.username);
        }
        Self {
            api: Rc::new(api),
            storage,
            key,
            session: Observable::new(restored),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.get()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(Option::is_some)
    }

    pub fn subscribe(&self, listener: impl Fn(&Option<Session>) + 'static) -> Subscription {
        self.session.subscribe(listener)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let session = self.api.authenticate(username, password).await?;
        tracing::info!("Logged in as {}", session.user.username);
        self.persist(&session);
        self.session.set(Some(session.clone()));
        Ok(session)
    }

    pub fn logout(&self) {
        if let Err(e) = store::remove(self.storage.as_ref(), &self.key) {
            tracing::warn!("Failed to remove stored session: {}", e);
        }
        if self.is_authenticated() {
            tracing::info!("Logged out");
            self.session.set(None);
        }
    }

    pub async fn register(&self, user: &NewUser) -> Result<(), ApiError> {
        let token = self.token();
        let result = self.api.register(token.as_deref(), user).await;
        self.checked(token.is_some(), result)
    }

    pub async fn get_all(&self) -> Result<Vec<User>, ApiError> {
        let token = self.token();
        let result = self.api.list(token.as_deref()).await;
        self.checked(token.is_some(), result)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, ApiError> {
        let token = self.token();
        let result = self.api.get(token.as_deref(), id).await;
        self.checked(token.is_some(), result)
    }

    /// Update an account. Editing yourself refreshes the published session.
    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<(), ApiError> {
        let token = self.token();
        let result = self.api.update(token.as_deref(), id, update).await;
        self.checked(token.is_some(), result)?;

        if self.is_current_user(id) {
            if let Some(mut session) = self.current() {
                session.user.apply(update);
                self.persist(&session);
                self.session.set(Some(session));
            }
        }
        Ok(())
    }

    /// Delete an account. Deleting yourself logs out.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let token = self.token();
        let result = self.api.delete(token.as_deref(), id).await;
        self.checked(token.is_some(), result)?;

        if self.is_current_user(id) {
            self.logout();
        }
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.session.with(|s| s.as_ref().map(|s| s.token.clone()))
    }

    fn is_current_user(&self, id: &str) -> bool {
        self.session
            .with(|s| s.as_ref().is_some_and(|s| s.user_id() == id))
    }

    fn checked<T>(&self, authenticated: bool, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            if authenticated && e.is_auth() {
                tracing::warn!("Session rejected by the server: {}", e);
                self.logout();
            }
        }
        result
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = store::save_json(self.storage.as_ref(), &self.key, session) {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::MemoryAccounts;
    use store::MemoryStorage;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            first_name: "First".into(),
            last_name: "Last".into(),
            username: username.into(),
            password: "secret1".into(),
        }
    }

    fn setup() -> (MemoryAccounts, MemoryStorage, SessionStore<MemoryAccounts>) {
        let api = MemoryAccounts::new();
        let storage = MemoryStorage::new();
        let session = SessionStore::new(api.clone(), Rc::new(storage.clone()), "user");
        (api, storage, session)
    }

    #[tokio::test]
    async fn test_login_publishes_and_persists() {
        let (api, storage, sessions) = setup();
        api.seed(new_user("ada"));

        let session = sessions.login("ada", "secret1").await.unwrap();
        assert_eq!(sessions.current(), Some(session.clone()));

        // A fresh store over the same storage comes up logged in
        let restarted = SessionStore::new(api.clone(), Rc::new(storage.clone()), "user");
        assert_eq!(restarted.current(), Some(session));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_empty() {
        let (api, storage, sessions) = setup();
        api.seed(new_user("ada"));

        let err = sessions.login("ada", "wrong").await.unwrap_err();
        assert!(err.is_auth());
        assert!(sessions.current().is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (api, storage, sessions) = setup();
        api.seed(new_user("ada"));
        sessions.login("ada", "secret1").await.unwrap();

        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let s = seen.clone();
        let _sub = sessions.subscribe(move |v| s.borrow_mut().push(v.is_some()));

        sessions.logout();
        assert!(!sessions.is_authenticated());
        assert!(storage.is_empty());
        assert_eq!(*seen.borrow(), vec![false]);
    }

    #[tokio::test]
    async fn test_corrupt_stored_session_is_dropped() {
        let storage = MemoryStorage::new();
        storage.set("user", "not json").unwrap();
        let sessions = SessionStore::new(MemoryAccounts::new(), Rc::new(storage.clone()), "user");
        assert!(sessions.current().is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_self_update_refreshes_session() {
        let (api, storage, sessions) = setup();
        let id = api.seed(new_user("ada"));
        sessions.login("ada", "secret1").await.unwrap();

        sessions
            .update(&id, &UserUpdate::new("Augusta", "King", "ada", ""))
            .await
            .unwrap();

        assert_eq!(sessions.current_user().unwrap().first_name, "Augusta");
        let persisted: Session = store::load_json(&storage, "user").unwrap().unwrap();
        assert_eq!(persisted.user.last_name, "King");
    }

    #[tokio::test]
    async fn test_updating_someone_else_leaves_session() {
        let (api, _storage, sessions) = setup();
        api.seed(new_user("ada"));
        let other = api.seed(new_user("bob"));
        sessions.login("ada", "secret1").await.unwrap();

        sessions
            .update(&other, &UserUpdate::new("Robert", "Last", "bob", ""))
            .await
            .unwrap();
        assert_eq!(sessions.current_user().unwrap().first_name, "First");
    }

    #[tokio::test]
    async fn test_deleting_self_logs_out() {
        let (api, _storage, sessions) = setup();
        let id = api.seed(new_user("ada"));
        sessions.login("ada", "secret1").await.unwrap();

        sessions.delete(&id).await.unwrap();
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_deleting_other_keeps_session() {
        let (api, _storage, sessions) = setup();
        api.seed(new_user("ada"));
        let other = api.seed(new_user("bob"));
        sessions.login("ada", "secret1").await.unwrap();

        sessions.delete(&other).await.unwrap();
        assert!(sessions.is_authenticated());
        assert_eq!(sessions.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_forces_logout() {
        let (api, storage, sessions) = setup();
        api.seed(new_user("ada"));
        sessions.login("ada", "secret1").await.unwrap();

        api.expire_tokens();
        let err = sessions.get_all().await.unwrap_err();
        assert!(err.is_auth());
        assert!(sessions.current().is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let (api, _storage, sessions) = setup();
        sessions.register(&new_user("ada")).await.unwrap();
        assert!(sessions.current().is_none());
        assert_eq!(api.calls_to("register"), 1);
    }
}
