use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::client::AccountsApi;
use crate::error::ApiError;
use crate::models::{NewUser, Session, User, UserUpdate};

/// In-memory accounts service for tests and offline demos.
///
/// Behaves like the remote API: usernames are unique, authenticated calls need a
/// token handed out by `authenticate`, and every call is counted so tests can
/// assert that nothing reached the "network".
#[derive(Clone, Debug, Default)]
pub struct MemoryAccounts {
    state: Rc<RefCell<State>>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    accounts: BTreeMap<String, Account>,
    tokens: BTreeMap<String, String>,
    calls: Vec<&'static str>,
    fail_next: Option<ApiError>,
    last_update: Option<UserUpdate>,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing the call log. Returns its id.
    pub fn seed(&self, user: NewUser) -> String {
        let mut state = self.state.borrow_mut();
        state.insert(user)
    }

    /// Total number of API calls made so far.
    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Number of calls made to one operation, e.g. `"update"`.
    pub fn calls_to(&self, operation: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    /// Make the next call fail with `error` before it touches any data.
    pub fn fail_next(&self, error: ApiError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    /// Invalidate every issued token, as if they all expired.
    pub fn expire_tokens(&self) {
        self.state.borrow_mut().tokens.clear();
    }

    /// The payload of the most recent successful `update`.
    pub fn last_update(&self) -> Option<UserUpdate> {
        self.state.borrow().last_update.clone()
    }

    pub fn password_of(&self, id: &str) -> Option<String> {
        self.state
            .borrow()
            .accounts
            .get(id)
            .map(|a| a.password.clone())
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.state.borrow().accounts.get(id).map(|a| a.user.clone())
    }

    fn begin(&self, operation: &'static str) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(operation);
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn authorize(&self, token: Option<&str>) -> Result<(), ApiError> {
        let state = self.state.borrow();
        match token {
            Some(token) if state.tokens.contains_key(token) => Ok(()),
            _ => Err(ApiError::Auth("Unauthorized".to_string())),
        }
    }
}

impl State {
    fn insert(&mut self, user: NewUser) -> String {
        self.next_id += 1;
        let id = self.next_id.to_string();
        self.accounts.insert(
            id.clone(),
            Account {
                user: User {
                    id: id.clone(),
                    first_name: user.first_name,
                    last_name: user.last_name,
                    username: user.username,
                },
                password: user.password,
            },
        );
        id
    }

    fn username_taken(&self, username: &str, except: Option<&str>) -> bool {
        self.accounts
            .values()
            .any(|a| a.user.username == username && Some(a.user.id.as_str()) != except)
    }
}

fn taken(username: &str) -> ApiError {
    ApiError::Validation(format!("Username \"{username}\" is already taken"))
}

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

impl AccountsApi for MemoryAccounts {
    async fn register(&self, _token: Option<&str>, user: &NewUser) -> Result<(), ApiError> {
        self.begin("register")?;
        let mut state = self.state.borrow_mut();
        if state.username_taken(&user.username, None) {
            return Err(taken(&user.username));
        }
        state.insert(user.clone());
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        self.begin("authenticate")?;
        let mut state = self.state.borrow_mut();
        let user = state
            .accounts
            .values()
            .find(|a| a.user.username == username && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| ApiError::Auth("Username or password is incorrect".to_string()))?;
        let token = format!("token-{}-{}", user.id, state.calls.len());
        state.tokens.insert(token.clone(), user.id.clone());
        Ok(Session { user, token })
    }

    async fn list(&self, token: Option<&str>) -> Result<Vec<User>, ApiError> {
        self.begin("list")?;
        self.authorize(token)?;
        Ok(self
            .state
            .borrow()
            .accounts
            .values()
            .map(|a| a.user.clone())
            .collect())
    }

    async fn get(&self, token: Option<&str>, id: &str) -> Result<User, ApiError> {
        self.begin("get")?;
        self.authorize(token)?;
        self.user(id).ok_or_else(not_found)
    }

    async fn update(
        &self,
        token: Option<&str>,
        id: &str,
        update: &UserUpdate,
    ) -> Result<(), ApiError> {
        self.begin("update")?;
        self.authorize(token)?;
        let mut state = self.state.borrow_mut();
        if state.username_taken(&update.username, Some(id)) {
            return Err(taken(&update.username));
        }
        let account = state.accounts.get_mut(id).ok_or_else(not_found)?;
        account.user.apply(update);
        if let Some(password) = &update.password {
            account.password = password.clone();
        }
        state.last_update = Some(update.clone());
        Ok(())
    }

    async fn delete(&self, token: Option<&str>, id: &str) -> Result<(), ApiError> {
        self.begin("delete")?;
        self.authorize(token)?;
        let mut state = self.state.borrow_mut();
        state.accounts.remove(id).ok_or_else(not_found)?;
        state.tokens.retain(|_, owner| owner != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> NewUser {
        NewUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            password: "engine1".into(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let api = MemoryAccounts::new();
        api.register(None, &ada()).await.unwrap();

        let err = api.register(None, &ada()).await.unwrap_err();
        assert_eq!(err, ApiError::Validation("Username \"ada\" is already taken".into()));
        assert_eq!(api.calls_to("register"), 2);
    }

    #[tokio::test]
    async fn test_authenticated_calls_need_a_live_token() {
        let api = MemoryAccounts::new();
        api.seed(ada());

        assert!(api.list(None).await.unwrap_err().is_auth());

        let session = api.authenticate("ada", "engine1").await.unwrap();
        assert_eq!(api.list(Some(&session.token)).await.unwrap().len(), 1);

        api.expire_tokens();
        assert!(api.list(Some(&session.token)).await.unwrap_err().is_auth());
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_error() {
        let api = MemoryAccounts::new();
        api.seed(ada());
        let err = api.authenticate("ada", "nope").await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_it() {
        let api = MemoryAccounts::new();
        let id = api.seed(ada());
        let session = api.authenticate("ada", "engine1").await.unwrap();

        let update = UserUpdate::new("Augusta", "King", "ada", "");
        api.update(Some(&session.token), &id, &update).await.unwrap();

        assert_eq!(api.password_of(&id).as_deref(), Some("engine1"));
        assert_eq!(api.user(&id).unwrap().first_name, "Augusta");
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let api = MemoryAccounts::new();
        api.fail_next(ApiError::Network("offline".into()));
        assert!(api.register(None, &ada()).await.is_err());
        assert!(api.register(None, &ada()).await.is_ok());
    }
}
