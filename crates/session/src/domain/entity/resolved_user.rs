//! Resolved User Entity
//!
//! The pairing of an auth-service principal with its board profile.

use serde::{Deserialize, Serialize};

use crate::domain::entity::principal::Principal;
use crate::domain::entity::profile::Profile;
use kernel::id::UserId;

/// Fully-resolved board user
///
/// Produced by identity resolution. The profile may be a stored row or
/// an in-memory default; either way `profile.id == principal.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedUser {
    /// Account identity from the auth service
    pub principal: Principal,
    /// Board profile for that account
    pub profile: Profile,
}

impl ResolvedUser {
    /// Pair a principal with its profile
    pub fn new(principal: Principal, profile: Profile) -> Self {
        debug_assert_eq!(principal.id, profile.id);
        Self { principal, profile }
    }

    /// Account UUID
    pub fn id(&self) -> &UserId {
        &self.principal.id
    }

    /// Display name
    pub fn username(&self) -> &str {
        &self.profile.username
    }
}
