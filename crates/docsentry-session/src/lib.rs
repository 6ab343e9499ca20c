//! DocSentry Session Management
//!
//! - A session is anonymous, restoring or authenticated
//! - The bearer credential lives in the storage layer's `token` slot with a
//!   one-day expiry
//! - Every API request carries the credential; any 401 ends the session
//!   and raises a single "session expired" notification

mod error;
mod manager;
mod state;
mod user;

pub use error::SessionError;
pub use manager::{SessionManager, LOGIN_FAILED, REGISTRATION_FAILED, SESSION_EXPIRED};
pub use state::{SessionEvent, SessionStatus};
pub use user::{RegistrationForm, User, UserId};

pub type Result<T> = std::result::Result<T, SessionError>;
