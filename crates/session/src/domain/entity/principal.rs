//! Principal Entity
//!
//! The account identity as reported by the remote auth service.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::email::Email;
use kernel::id::UserId;

/// Authenticated principal
///
/// Carries only what the auth service knows about the account.
/// Board-side data (username, biography) lives in the Profile entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Account UUID, shared with the profile row
    pub id: UserId,
    /// Sign-in email; absent for some third-party provider accounts
    pub email: Option<Email>,
}

impl Principal {
    /// Create a new principal
    pub fn new(id: UserId, email: Option<Email>) -> Self {
        Self { id, email }
    }
}
