//! Session Manager
//!
//! Owns the current user, the stored bearer credential and the interceptor
//! that every API call runs through. The interceptor is installed on the
//! manager's [`ApiClient`] at construction; other services should issue their
//! calls through [`SessionManager::client`] so they get the same treatment.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

use docsentry_client::{
    attach_credential, inspect_response, ApiClient, ApiRequest, ApiResponse, Interceptor,
    Notifier, ResponseVerdict, Transport,
};
use docsentry_storage::{Database, TOKEN_SLOT};

use crate::error::SessionError;
use crate::state::{SessionEvent, SessionState, SessionStatus};
use crate::user::{AuthGrant, LoginRequest, ProfileResponse, RegisterRequest, RegistrationForm, User};
use crate::Result;

const EVENT_CAPACITY: usize = 16;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Profile lookup used to resolve a stored credential
const PROFILE_PATH: &str = "/auth/me";

struct Shared {
    db: Database,
    notifier: Notifier,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Shared {
    fn status(&self) -> SessionStatus {
        self.state.read().status
    }

    fn publish(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    /// Drop the credential and the user. Storage failures are logged; the
    /// in-memory session still ends.
    fn teardown(&self) {
        if let Err(e) = self.db.remove_credential(TOKEN_SLOT) {
            tracing::error!(error = %e, "Failed to remove stored credential");
        }
        *self.state.write() = SessionState::anonymous();
    }

    fn expire(&self) {
        let was = self.status();
        self.teardown();

        tracing::warn!(previous = %was, "Session expired");
        self.notifier.error(SESSION_EXPIRED);
        self.publish(SessionEvent::Expired);
    }
}

/// Attaches the stored credential to outgoing requests and tears the session
/// down when the API answers 401.
struct SessionInterceptor {
    shared: Arc<Shared>,
}

impl Interceptor for SessionInterceptor {
    fn on_request(&self, request: ApiRequest) -> ApiRequest {
        let credential = match self.shared.db.credential(TOKEN_SLOT) {
            Ok(credential) => credential,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored credential");
                None
            }
        };
        attach_credential(request, credential.as_deref())
    }

    fn on_response(&self, request: &ApiRequest, response: &ApiResponse) {
        if inspect_response(response.status) != ResponseVerdict::SessionExpired {
            return;
        }

        // The restore's own profile lookup fails silently; restore cleans up
        if self.shared.status() == SessionStatus::Restoring && request.path == PROFILE_PATH {
            return;
        }

        tracing::debug!(path = %request.path, "Credential rejected");
        self.shared.expire();
    }
}

#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
    client: ApiClient,
}

impl SessionManager {
    pub fn new(db: Database, transport: Arc<dyn Transport>, notifier: Notifier) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            db,
            notifier,
            state: RwLock::new(SessionState::restoring()),
            events,
        });

        let client = ApiClient::new(transport).with_interceptor(Arc::new(SessionInterceptor {
            shared: Arc::clone(&shared),
        }));

        Self { shared, client }
    }

    /// Client carrying the session interceptor
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.status()
    }

    pub fn current_user(&self) -> Option<User> {
        self.shared.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Resolve a stored credential into a user. Never fails: anything that
    /// goes wrong leaves the session anonymous without a stored credential.
    pub async fn restore_session(&self) -> SessionStatus {
        *self.shared.state.write() = SessionState::restoring();

        let has_credential = match self.shared.db.credential(TOKEN_SLOT) {
            Ok(credential) => credential.is_some(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored credential");
                false
            }
        };

        if !has_credential {
            *self.shared.state.write() = SessionState::anonymous();
            tracing::info!("No stored session");
            self.shared.publish(SessionEvent::Restored { user: None });
            return SessionStatus::Anonymous;
        }

        match self.client.get_json::<ProfileResponse>(PROFILE_PATH).await {
            Ok(profile) => {
                let user = profile.user;
                *self.shared.state.write() = SessionState::authenticated(user.clone());

                tracing::info!(user_id = %user.id, "Restored session");
                self.shared.publish(SessionEvent::Restored { user: Some(user) });
                SessionStatus::Authenticated
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored credential rejected, discarding");
                self.shared.teardown();
                self.shared.publish(SessionEvent::Restored { user: None });
                SessionStatus::Anonymous
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let grant: AuthGrant = self
            .client
            .post_json("/auth/login", &LoginRequest { email, password })
            .await
            .map_err(|e| SessionError::auth_failed(e, LOGIN_FAILED))?;

        let user = self.establish(grant)?;

        tracing::info!(user_id = %user.id, "Logged in");
        self.shared
            .notifier
            .success(format!("Welcome back, {}!", user.name));
        self.shared.publish(SessionEvent::LoggedIn(user.clone()));

        Ok(user)
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<User> {
        let grant: AuthGrant = self
            .client
            .post_json("/auth/register", &RegisterRequest::from(form))
            .await
            .map_err(|e| SessionError::auth_failed(e, REGISTRATION_FAILED))?;

        let user = self.establish(grant)?;

        tracing::info!(user_id = %user.id, "Registered");
        self.shared
            .notifier
            .success(format!("Welcome, {}!", user.name));
        self.shared.publish(SessionEvent::Registered(user.clone()));

        Ok(user)
    }

    pub fn logout(&self) {
        self.shared.teardown();

        tracing::info!("Logged out");
        self.shared.notifier.success("Logged out successfully");
        self.shared.publish(SessionEvent::LoggedOut);
    }

    /// Persist the credential first; the in-memory session only changes once
    /// the credential is durable.
    fn establish(&self, grant: AuthGrant) -> Result<User> {
        self.shared.db.store_credential(TOKEN_SLOT, &grant.token)?;
        *self.shared.state.write() = SessionState::authenticated(grant.user.clone());
        Ok(grant.user)
    }
}
