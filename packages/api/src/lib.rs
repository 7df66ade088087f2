//! # API crate: client side of the remote accounts service
//!
//! Everything the console knows about the accounts API lives here: the wire models,
//! the error taxonomy, and the [`AccountsApi`] trait with its two implementations.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | [`User`], [`NewUser`], [`UserUpdate`] and the authenticated [`Session`] |
//! | [`error`] | [`ApiError`]: validation, auth, not-found, network, server and decode failures |
//! | [`client`] | The [`AccountsApi`] trait and the `reqwest`-backed [`HttpAccounts`] |
//!
//! [`MemoryAccounts`] implements the same trait in process, with call counters, for
//! tests.

pub mod client;
pub mod error;
mod memory;
pub mod models;

pub use client::{AccountsApi, HttpAccounts};
pub use error::ApiError;
pub use memory::MemoryAccounts;
pub use models::{NewUser, Session, User, UserUpdate};
