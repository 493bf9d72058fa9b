//! In-Memory Boundary Implementations
//!
//! Process-local stand-ins for the remote auth and profile services,
//! used by tests and the demo binary. Semantics mirror the hosted
//! service: change events on every session transition, duplicate
//! detection on profile inserts, first-row reads.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::domain::boundary::{
    AuthGateway, OauthProvider, ProfileStore, SessionEvent, SessionEventKind,
};
use crate::domain::entity::principal::Principal;
use crate::domain::entity::profile::{Profile, ProfilePatch};
use crate::domain::value_object::email::Email;
use crate::error::{SessionError, SessionResult};
use kernel::id::UserId;

/// Buffered session-change events per subscriber
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Stored account record, keyed by email
struct Account {
    id: UserId,
    email: String,
    /// `None` for accounts created through OTP sign-in
    password: Option<String>,
}

impl Account {
    fn principal(&self) -> Principal {
        Principal::new(self.id, Some(Email::from_db(&self.email)))
    }
}

struct GatewayState {
    accounts: HashMap<String, Account>,
    session: Option<Principal>,
}

/// In-memory auth gateway
///
/// Besides the [`AuthGateway`] surface it exposes two server-side
/// knobs, [`revoke_session`](Self::revoke_session) and
/// [`refresh_session`](Self::refresh_session), for driving externally
/// initiated session changes.
pub struct MemoryAuthGateway {
    state: Mutex<GatewayState>,
    events: broadcast::Sender<SessionEvent>,
}

impl MemoryAuthGateway {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(GatewayState {
                accounts: HashMap::new(),
                session: None,
            }),
            events,
        }
    }

    /// End the session from the server side (revocation, expiry)
    pub fn revoke_session(&self) {
        self.lock().session = None;
        self.emit(SessionEventKind::SignedOut, None);
    }

    /// Rotate the session token, announcing a TokenRefreshed event
    pub fn refresh_session(&self) {
        let principal = self.lock().session.clone();
        if let Some(principal) = principal {
            self.emit(SessionEventKind::TokenRefreshed, Some(principal));
        }
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().expect("gateway state lock poisoned")
    }

    fn emit(&self, kind: SessionEventKind, principal: Option<Principal>) {
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(SessionEvent::new(kind, principal));
    }
}

impl Default for MemoryAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGateway for MemoryAuthGateway {
    async fn current_session(&self) -> SessionResult<Option<Principal>> {
        Ok(self.lock().session.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn sign_up_with_password(&self, email: &Email, password: &str) -> SessionResult<()> {
        let principal = {
            let mut state = self.lock();
            if state.accounts.contains_key(email.as_str()) {
                return Err(SessionError::Credentials(
                    "User already registered".to_string(),
                ));
            }

            let account = Account {
                id: UserId::new(),
                email: email.as_str().to_string(),
                password: Some(password.to_string()),
            };
            let principal = account.principal();
            state.accounts.insert(email.as_str().to_string(), account);
            state.session = Some(principal.clone());
            principal
        };

        tracing::debug!(user_id = %principal.id, "Account registered");
        self.emit(SessionEventKind::SignedIn, Some(principal));
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &Email, password: &str) -> SessionResult<()> {
        let principal = {
            let mut state = self.lock();
            let principal = match state.accounts.get(email.as_str()) {
                Some(account) if account.password.as_deref() == Some(password) => {
                    account.principal()
                }
                _ => {
                    return Err(SessionError::Credentials(
                        "Invalid login credentials".to_string(),
                    ));
                }
            };
            state.session = Some(principal.clone());
            principal
        };

        self.emit(SessionEventKind::SignedIn, Some(principal));
        Ok(())
    }

    async fn sign_in_with_otp(&self, email: &Email) -> SessionResult<()> {
        // The hosted service emails a code and signs in on
        // verification; here the verification step is elided and the
        // account is created on first use.
        let principal = {
            let mut state = self.lock();
            let principal = state
                .accounts
                .entry(email.as_str().to_string())
                .or_insert_with(|| Account {
                    id: UserId::new(),
                    email: email.as_str().to_string(),
                    password: None,
                })
                .principal();
            state.session = Some(principal.clone());
            principal
        };

        self.emit(SessionEventKind::SignedIn, Some(principal));
        Ok(())
    }

    async fn sign_in_with_oauth(&self, provider: OauthProvider) -> SessionResult<()> {
        Err(SessionError::Credentials(format!(
            "Provider {} is not enabled",
            provider
        )))
    }

    async fn sign_out(&self) -> SessionResult<()> {
        self.lock().session = None;
        self.emit(SessionEventKind::SignedOut, None);
        Ok(())
    }
}

/// In-memory profile store
pub struct MemoryProfileStore {
    rows: Mutex<HashMap<UserId, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, Profile>> {
        self.rows.lock().expect("profile rows lock poisoned")
    }

    /// Snapshot of all stored rows
    pub fn snapshot(&self) -> Vec<Profile> {
        self.lock().values().cloned().collect()
    }

    /// Delete a row from the server side
    pub fn remove(&self, user_id: &UserId) -> Option<Profile> {
        self.lock().remove(user_id)
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn find_by_id(&self, user_id: &UserId) -> SessionResult<Option<Profile>> {
        Ok(self.lock().get(user_id).cloned())
    }

    async fn insert(&self, profile: &Profile) -> SessionResult<Profile> {
        let mut rows = self.lock();
        if rows.contains_key(&profile.id) {
            return Err(SessionError::DuplicateProfile);
        }
        rows.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, user_id: &UserId, patch: &ProfilePatch) -> SessionResult<Profile> {
        let mut rows = self.lock();
        let profile = rows.get_mut(user_id).ok_or_else(|| {
            SessionError::Boundary("No profile row to update".to_string())
        })?;
        profile.apply(patch);
        Ok(profile.clone())
    }
}
