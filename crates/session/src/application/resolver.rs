//! Identity Resolution Use Case
//!
//! Turns an authenticated principal into a fully-resolved board user,
//! provisioning the profile row on first sign-in.

use std::sync::Arc;

use tokio::time::timeout;

use crate::application::config::ResolverConfig;
use crate::domain::boundary::ProfileStore;
use crate::domain::entity::principal::Principal;
use crate::domain::entity::profile::Profile;
use crate::domain::entity::resolved_user::ResolvedUser;
use crate::error::{SessionError, SessionResult};
use kernel::id::UserId;

/// Identity resolver
///
/// Resolution is total: every code path ends in a [`ResolvedUser`].
/// When the profile row cannot be read or written, an in-memory
/// default profile stands in so sign-in is never blocked on profile
/// storage.
pub struct IdentityResolver<P>
where
    P: ProfileStore,
{
    profiles: Arc<P>,
    config: ResolverConfig,
}

impl<P> Clone for IdentityResolver<P>
where
    P: ProfileStore,
{
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            config: self.config,
        }
    }
}

impl<P> IdentityResolver<P>
where
    P: ProfileStore,
{
    pub fn new(profiles: Arc<P>, config: ResolverConfig) -> Self {
        Self { profiles, config }
    }

    /// Resolve a principal into a board user
    pub async fn resolve(&self, principal: &Principal) -> ResolvedUser {
        let profile = match self.lookup(&principal.id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => self.provision(principal).await,
            Err(e) => {
                // A slow or failing read counts as "no row yet" during
                // resolution; resolution itself must not fail outward.
                tracing::warn!(user_id = %principal.id, error = %e, "Profile lookup failed");
                self.provision(principal).await
            }
        };

        ResolvedUser::new(principal.clone(), profile)
    }

    /// Profile lookup bounded by the configured timeout
    ///
    /// An elapsed bound surfaces as [`SessionError::LookupTimeout`];
    /// the caller decides whether that is fatal.
    pub async fn lookup(&self, user_id: &UserId) -> SessionResult<Option<Profile>> {
        match timeout(self.config.lookup_timeout, self.profiles.find_by_id(user_id)).await {
            Ok(found) => found,
            Err(_) => {
                tracing::debug!(
                    user_id = %user_id,
                    timeout_ms = self.config.lookup_timeout_ms(),
                    "Profile lookup timed out"
                );
                Err(SessionError::LookupTimeout)
            }
        }
    }

    /// Insert a fresh profile row, falling back to an in-memory
    /// default when the insert cannot land
    async fn provision(&self, principal: &Principal) -> Profile {
        let username = Profile::default_username(principal.email.as_ref());
        let fresh = Profile::provisioned(principal.id, username);

        match self.profiles.insert(&fresh).await {
            Ok(stored) => {
                tracing::info!(
                    user_id = %principal.id,
                    username = %stored.username,
                    "Profile provisioned"
                );
                stored
            }
            Err(SessionError::DuplicateProfile) => {
                // A concurrent resolution won the insert. The default
                // copy serves this pass; the next resolve reads the
                // stored row.
                tracing::debug!(user_id = %principal.id, "Profile already provisioned concurrently");
                fresh
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %principal.id,
                    error = %e,
                    "Profile insert failed; serving default profile"
                );
                fresh
            }
        }
    }
}
