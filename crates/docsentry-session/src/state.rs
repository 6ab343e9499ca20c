//! Session State Machine
//!
//! ```text
//! Restoring ──no credential / rejected──▶ Anonymous
//!     │                                    ▲   │
//!     └──profile fetched──▶ Authenticated ─┘   │ login / register
//!                                ▲  logout / 401│
//!                                └──────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Anonymous,
    /// Startup: a stored credential may still resolve to a user
    Restoring,
    Authenticated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Anonymous => "anonymous",
            SessionStatus::Restoring => "restoring",
            SessionStatus::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Published to subscribers after every transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Startup restore finished; `None` means it ended anonymous
    Restored { user: Option<User> },
    LoggedIn(User),
    Registered(User),
    LoggedOut,
    /// The API rejected the credential on some call
    Expired,
}

impl SessionEvent {
    /// Status the session is in after this event
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionEvent::Restored { user: Some(_) }
            | SessionEvent::LoggedIn(_)
            | SessionEvent::Registered(_) => SessionStatus::Authenticated,
            SessionEvent::Restored { user: None }
            | SessionEvent::LoggedOut
            | SessionEvent::Expired => SessionStatus::Anonymous,
        }
    }
}

/// Current user and status, always updated together
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    pub status: SessionStatus,
    pub user: Option<User>,
}

impl SessionState {
    pub fn restoring() -> Self {
        Self {
            status: SessionStatus::Restoring,
            user: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            user: None,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserId;

    fn user() -> User {
        User {
            id: UserId::Number(1),
            name: "A".to_string(),
            email: None,
            organization: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_event_status() {
        assert_eq!(
            SessionEvent::LoggedIn(user()).status(),
            SessionStatus::Authenticated
        );
        assert_eq!(
            SessionEvent::Restored { user: Some(user()) }.status(),
            SessionStatus::Authenticated
        );
        assert_eq!(
            SessionEvent::Restored { user: None }.status(),
            SessionStatus::Anonymous
        );
        assert_eq!(SessionEvent::Expired.status(), SessionStatus::Anonymous);
    }

    #[test]
    fn test_user_only_when_authenticated() {
        assert!(SessionState::restoring().user.is_none());
        assert!(SessionState::anonymous().user.is_none());

        let state = SessionState::authenticated(user());
        assert_eq!(state.status, SessionStatus::Authenticated);
        assert!(state.user.is_some());
    }
}
