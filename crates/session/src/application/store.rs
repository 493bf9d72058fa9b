//! Session Store
//!
//! Process-wide session state machine. The store owns the single
//! subscription to the gateway's session-change events and publishes
//! the current state through a watch channel.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::application::config::ResolverConfig;
use crate::application::resolver::IdentityResolver;
use crate::domain::boundary::{AuthGateway, OauthProvider, ProfileStore, SessionEvent};
use crate::domain::entity::profile::{Profile, ProfilePatch};
use crate::domain::entity::resolved_user::ResolvedUser;
use crate::domain::value_object::email::Email;
use crate::error::SessionResult;

/// Session state
///
/// ```text
/// Unresolved -> Resolving -> Authenticated(user)
///                         -> Anonymous
/// ```
///
/// After the initial resolution the state moves between
/// `Authenticated` and `Anonymous`, driven by gateway events. Readers
/// that arrive before the initial resolution observe `Unresolved` or
/// `Resolving` and can render placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Initial query has not started
    Unresolved,
    /// Initial query is in flight
    Resolving,
    /// A signed-in user with a resolved profile
    Authenticated(ResolvedUser),
    /// No session
    Anonymous,
}

impl SessionState {
    /// The resolved user, when authenticated
    pub fn user(&self) -> Option<&ResolvedUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Whether the initial resolution has finished
    pub fn is_settled(&self) -> bool {
        !matches!(self, SessionState::Unresolved | SessionState::Resolving)
    }
}

/// Session store
///
/// Holds the gateway, the identity resolver, and the state cell.
/// Sign-in style methods only relay the request to the gateway; the
/// state transition happens when the gateway's change event arrives.
/// The listener task is aborted on [`shutdown`](Self::shutdown) or
/// drop.
pub struct SessionStore<G, P>
where
    G: AuthGateway + Send + Sync + 'static,
    P: ProfileStore + Send + Sync + 'static,
{
    gateway: Arc<G>,
    profiles: Arc<P>,
    resolver: IdentityResolver<P>,
    state: watch::Sender<SessionState>,
    listener: JoinHandle<()>,
}

impl<G, P> SessionStore<G, P>
where
    G: AuthGateway + Send + Sync + 'static,
    P: ProfileStore + Send + Sync + 'static,
{
    /// Connect to the gateway
    ///
    /// Subscribes to session-change events and kicks off the initial
    /// resolution in a background task; the store is usable right
    /// away, reporting `Unresolved` until the first query lands. The
    /// subscription is taken before the query so no event can slip
    /// between the two.
    pub fn connect(gateway: Arc<G>, profiles: Arc<P>, config: ResolverConfig) -> Self {
        let resolver = IdentityResolver::new(Arc::clone(&profiles), config);
        let (state, _) = watch::channel(SessionState::Unresolved);

        let events = gateway.subscribe();
        let listener = tokio::spawn(Self::run(
            Arc::clone(&gateway),
            events,
            resolver.clone(),
            state.clone(),
        ));

        Self {
            gateway,
            profiles,
            resolver,
            state,
            listener,
        }
    }

    /// Initial resolution followed by the event loop
    ///
    /// Events are applied in arrival order, one at a time; a slow
    /// resolve delays later events instead of racing them.
    async fn run(
        gateway: Arc<G>,
        mut events: broadcast::Receiver<SessionEvent>,
        resolver: IdentityResolver<P>,
        state: watch::Sender<SessionState>,
    ) {
        state.send_replace(SessionState::Resolving);
        let initial = match gateway.current_session().await {
            Ok(Some(principal)) => {
                SessionState::Authenticated(resolver.resolve(&principal).await)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                // Fail closed: an unreadable session is no session.
                tracing::warn!(error = %e, "Initial session query failed; starting anonymous");
                SessionState::Anonymous
            }
        };
        tracing::debug!(
            authenticated = initial.is_authenticated(),
            "Initial session resolved"
        );
        state.send_replace(initial);

        loop {
            match events.recv().await {
                Ok(event) => {
                    let next = match &event.principal {
                        Some(principal) => {
                            SessionState::Authenticated(resolver.resolve(principal).await)
                        }
                        None => SessionState::Anonymous,
                    };
                    tracing::debug!(kind = ?event.kind, "Session change applied");
                    state.send_replace(next);
                }
                Err(RecvError::Lagged(skipped)) => {
                    // The next event still carries the full session
                    // snapshot, so a skip is recoverable.
                    tracing::warn!(skipped, "Session event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    // ========================================================================
    // State access
    // ========================================================================

    /// Current session state (cheap clone of the cell)
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Currently signed-in user, if any
    pub fn current_user(&self) -> Option<ResolvedUser> {
        self.state.borrow().user().cloned()
    }

    /// Observe state changes
    ///
    /// Every store method and every gateway event publishes through
    /// this channel.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait for the initial resolution to finish
    ///
    /// Returns the first state that is neither `Unresolved` nor
    /// `Resolving`.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(SessionState::is_settled).await {
            Ok(state) => state.clone(),
            // The sender lives in self, so the channel cannot close
            // while we are borrowed; keep the arm total anyway.
            Err(_) => SessionState::Anonymous,
        }
    }

    // ========================================================================
    // Gateway-delegated operations
    // ========================================================================
    //
    // None of these touch local state on success. The gateway's
    // SignedIn event is the sole trigger for the transition to
    // Authenticated.

    /// Register a new account
    pub async fn sign_up_with_password(&self, email: &Email, password: &str) -> SessionResult<()> {
        self.gateway.sign_up_with_password(email, password).await
    }

    /// Sign in with email and password
    pub async fn sign_in_with_password(&self, email: &Email, password: &str) -> SessionResult<()> {
        self.gateway.sign_in_with_password(email, password).await
    }

    /// Request a one-time-password sign-in
    pub async fn sign_in_with_otp(&self, email: &Email) -> SessionResult<()> {
        self.gateway.sign_in_with_otp(email).await
    }

    /// Start a third-party provider sign-in
    pub async fn sign_in_with_oauth(&self, provider: OauthProvider) -> SessionResult<()> {
        self.gateway.sign_in_with_oauth(provider).await
    }

    /// Sign out
    ///
    /// Local state is cleared without waiting for the SignedOut event,
    /// and even when the gateway call fails.
    pub async fn sign_out(&self) {
        if let Err(e) = self.gateway.sign_out().await {
            tracing::warn!(error = %e, "Gateway sign-out failed; clearing local session anyway");
        }
        self.state.send_replace(SessionState::Anonymous);
        tracing::info!("Signed out");
    }

    // ========================================================================
    // Profile updates
    // ========================================================================

    /// Update the signed-in user's profile
    ///
    /// No-op while anonymous. Writes the patch to the profile row
    /// (inserting a merged default when the row is missing), then
    /// re-resolves so the held state reflects the write. The read
    /// shares the resolver's lookup bound; read and write failures
    /// propagate to the caller.
    pub async fn update_profile(&self, patch: ProfilePatch) -> SessionResult<()> {
        let Some(user) = self.current_user() else {
            return Ok(());
        };
        let patch = patch.normalized()?;
        let user_id = user.principal.id;

        match self.resolver.lookup(&user_id).await? {
            Some(_) => {
                self.profiles.update(&user_id, &patch).await?;
            }
            None => {
                let username = Profile::default_username(user.principal.email.as_ref());
                let mut profile = Profile::provisioned(user_id, username);
                profile.apply(&patch);
                self.profiles.insert(&profile).await?;
            }
        }
        tracing::info!(user_id = %user_id, "Profile updated");

        let refreshed = self.resolver.resolve(&user.principal).await;
        // Skip the publish if the session changed while we were
        // writing; a SignedOut must not be overwritten.
        self.state.send_if_modified(|state| match state {
            SessionState::Authenticated(current) if current.principal.id == user_id => {
                *state = SessionState::Authenticated(refreshed);
                true
            }
            _ => false,
        });

        Ok(())
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stop listening for session-change events
    ///
    /// Dropping the store has the same effect.
    pub fn shutdown(&self) {
        self.listener.abort();
    }
}

impl<G, P> Drop for SessionStore<G, P>
where
    G: AuthGateway + Send + Sync + 'static,
    P: ProfileStore + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.listener.abort();
    }
}
