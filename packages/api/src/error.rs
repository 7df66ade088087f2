//! Errors returned by [`AccountsApi`](crate::AccountsApi) calls.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server rejected the payload (duplicate username, bad field).
    #[error("{0}")]
    Validation(String),
    /// Bad credentials, or the bearer token is missing, invalid or expired.
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),
    /// Any other non-2xx response; the message is the server's, verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error means the current session is no longer usable.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Map a non-2xx status and its body to an error.
    ///
    /// Bodies of the form `{"message": "..."}` contribute their message; any other
    /// non-empty body is used as-is, and an empty body falls back to a generic
    /// description of the status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = message_from_body(body).unwrap_or_else(|| default_message(status));
        match status {
            400 | 409 | 422 => ApiError::Validation(message),
            401 | 403 => ApiError::Auth(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Server { status, message },
        }
    }

    /// Failed `authenticate` calls are credential problems whatever the status.
    pub(crate) fn into_login_error(self) -> Self {
        match self {
            ApiError::Validation(message) => ApiError::Auth(message),
            other => other,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => Some(parsed.message),
        Err(_) => Some(body.to_string()),
    }
}

fn default_message(status: u16) -> String {
    match status {
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not found".to_string(),
        _ => format!("Request failed with status {status}"),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
