//! # Account models exchanged with the accounts API
//!
//! Three shapes of a user travel over the wire:
//!
//! ## [`User`]
//!
//! An account as the API returns it from `GET /accounts` and `GET /accounts/{id}`.
//! Field names are camelCase on the wire (`firstName`, `lastName`). The `id` is kept
//! as a `String` on the client; servers that hand out numeric ids are accepted too
//! and the number is converted to its decimal text.
//!
//! ## [`NewUser`]
//!
//! The register / add payload. All four fields are mandatory, including `password`.
//!
//! ## [`UserUpdate`]
//!
//! The partial `PUT /accounts/{id}` payload. `password` is skipped during
//! serialization when it is `None`, and [`UserUpdate::new`] turns an empty password
//! into `None`, so "leave blank to keep the same password" never reaches the server
//! as an empty string.
//!
//! ## [`Session`]
//!
//! The `POST /accounts/authenticate` response: the user's fields flattened next to a
//! bearer `token`. The same JSON document is what the console keeps in durable
//! storage between runs.

use serde::{Deserialize, Deserializer, Serialize};

/// An account as returned by the API. Never carries a password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl User {
    /// "First Last", used by the list view and the home greeting.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Apply the non-secret parts of an update to a locally held copy.
    pub fn apply(&mut self, update: &UserUpdate) {
        self.first_name = update.first_name.clone();
        self.last_name = update.last_name.clone();
        self.username = update.username.clone();
    }
}

/// Register / add payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

/// Edit payload. A missing password means "unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            password: (!password.is_empty()).then_some(password),
        }
    }
}

/// An authenticated user plus the bearer token the API issued for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_numeric_id() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"firstName":"Ada","lastName":"Lovelace","username":"ada"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_update_without_password_omits_field() {
        let update = UserUpdate::new("Ada", "Lovelace", "ada", "");
        assert!(update.password.is_none());

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_update_with_password_keeps_it() {
        let update = UserUpdate::new("Ada", "Lovelace", "ada", "secret1");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["password"], "secret1");
    }

    #[test]
    fn test_session_is_flat_on_the_wire() {
        let session: Session = serde_json::from_str(
            r#"{"id":"1","firstName":"A","lastName":"B","username":"ab","token":"t0k"}"#,
        )
        .unwrap();
        assert_eq!(session.user_id(), "1");
        assert_eq!(session.token, "t0k");

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["username"], "ab");
        assert_eq!(json["token"], "t0k");
    }

    #[test]
    fn test_apply_update_keeps_id() {
        let mut user = User {
            id: "3".into(),
            first_name: "Old".into(),
            last_name: "Name".into(),
            username: "old".into(),
        };
        user.apply(&UserUpdate::new("New", "Name", "new", "whatever"));
        assert_eq!(user.id, "3");
        assert_eq!(user.first_name, "New");
        assert_eq!(user.username, "new");
    }
}
