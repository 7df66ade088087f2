//! Data models for the accounts API.

mod user;

pub use user::{NewUser, Session, User, UserUpdate};
