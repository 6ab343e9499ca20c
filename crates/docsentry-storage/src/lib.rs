//! DocSentry Storage Layer
//!
//! SQLite-backed persistence for client state that must outlive the process.
//! Today that is the bearer credential slot; expiry is enforced here, not by
//! callers.

mod credentials;
mod database;
mod error;
mod migrations;

pub use credentials::{StoredCredential, CREDENTIAL_TTL_DAYS, TOKEN_SLOT};
pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
