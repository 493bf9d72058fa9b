//! Boundary Traits
//!
//! Interfaces to the remote store's auth and profile services.
//! Implementations are in the infrastructure layer.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::entity::principal::Principal;
use crate::domain::entity::profile::{Profile, ProfilePatch};
use crate::domain::value_object::email::Email;
use crate::error::SessionResult;
use kernel::id::UserId;

/// What changed in the remote auth session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEventKind {
    /// A session was established (sign-in or sign-up)
    SignedIn,
    /// The session ended, locally or server-side
    SignedOut,
    /// The session's token was rotated
    TokenRefreshed,
}

/// Session-change notification pushed by the auth service
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    /// Change kind
    pub kind: SessionEventKind,
    /// The session's principal after the change; `None` when the
    /// session ended
    pub principal: Option<Principal>,
}

impl SessionEvent {
    pub fn new(kind: SessionEventKind, principal: Option<Principal>) -> Self {
        Self { kind, principal }
    }
}

/// Third-party sign-in provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OauthProvider {
    Github,
    Google,
    Discord,
}

impl OauthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OauthProvider::Github => "github",
            OauthProvider::Google => "google",
            OauthProvider::Discord => "discord",
        }
    }
}

impl std::fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Auth service gateway trait
///
/// Sign-in and sign-up calls report acceptance or rejection only; the
/// resulting session is announced through the event stream.
#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// Session currently held by the auth service, if any
    async fn current_session(&self) -> SessionResult<Option<Principal>>;

    /// Subscribe to session-change events
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// Register a new account with email and password
    async fn sign_up_with_password(&self, email: &Email, password: &str) -> SessionResult<()>;

    /// Sign in with email and password
    async fn sign_in_with_password(&self, email: &Email, password: &str) -> SessionResult<()>;

    /// Request a one-time-password sign-in for the email
    async fn sign_in_with_otp(&self, email: &Email) -> SessionResult<()>;

    /// Start a third-party provider sign-in
    async fn sign_in_with_oauth(&self, provider: OauthProvider) -> SessionResult<()>;

    /// End the current session
    async fn sign_out(&self) -> SessionResult<()>;
}

/// Profile store trait
#[trait_variant::make(ProfileStore: Send)]
pub trait LocalProfileStore {
    /// Find a profile row by account id
    ///
    /// Returns the first matching row; the read makes no uniqueness
    /// assumption about the underlying table.
    async fn find_by_id(&self, user_id: &UserId) -> SessionResult<Option<Profile>>;

    /// Insert a fresh profile row
    ///
    /// Returns `SessionError::DuplicateProfile` when a row with the
    /// same id already exists.
    async fn insert(&self, profile: &Profile) -> SessionResult<Profile>;

    /// Apply a patch to an existing profile row
    async fn update(&self, user_id: &UserId, patch: &ProfilePatch) -> SessionResult<Profile>;
}
