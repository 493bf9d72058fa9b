//! Profile Entity
//!
//! Board-side user profile stored in the remote store's `profiles`
//! table, plus the typed patch used to update it.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::domain::value_object::email::Email;
use crate::error::{SessionError, SessionResult};
use kernel::id::UserId;

/// Maximum username length in characters (after normalization)
const USERNAME_MAX_CHARS: usize = 64;

/// User profile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same UUID as the auth-service account
    pub id: UserId,
    /// Display name, derived from the email on first sign-in
    pub username: String,
    /// Free-form self description
    pub biography: String,
}

impl Profile {
    /// Create a fresh profile with an empty biography
    pub fn provisioned(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            biography: String::new(),
        }
    }

    /// Username used when no profile row exists yet
    ///
    /// The local part of the sign-in email, or `"user"` when the
    /// account has no usable email.
    pub fn default_username(email: Option<&Email>) -> String {
        match email {
            Some(email) if !email.local_part().is_empty() => email.local_part().to_string(),
            _ => "user".to_string(),
        }
    }

    /// Merge a patch into this profile
    ///
    /// `None` fields are left untouched.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(biography) = &patch.biography {
            self.biography = biography.clone();
        }
    }
}

/// Partial profile update
///
/// Fields set to `None` are not modified by the write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// New display name
    pub username: Option<String>,
    /// New biography
    pub biography: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch modifies anything
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.biography.is_none()
    }

    /// Validate the patch and normalize its username
    ///
    /// Usernames are NFKC-normalized and trimmed. Empty patches and
    /// blank usernames are rejected.
    pub fn normalized(mut self) -> SessionResult<Self> {
        if self.is_empty() {
            return Err(SessionError::Validation(
                "Patch does not modify any field".to_string(),
            ));
        }

        if let Some(username) = self.username.take() {
            let username: String = username.nfkc().collect::<String>().trim().to_string();

            if username.is_empty() {
                return Err(SessionError::Validation(
                    "Username cannot be blank".to_string(),
                ));
            }
            if username.chars().count() > USERNAME_MAX_CHARS {
                return Err(SessionError::Validation(format!(
                    "Username must be at most {} characters",
                    USERNAME_MAX_CHARS
                )));
            }

            self.username = Some(username);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_username_from_email() {
        let email = Email::new("alice@example.com").unwrap();
        assert_eq!(Profile::default_username(Some(&email)), "alice");
        assert_eq!(Profile::default_username(None), "user");
    }

    #[test]
    fn test_apply_patch_merges_only_set_fields() {
        let mut profile = Profile::provisioned(UserId::new(), "alice");
        profile.apply(&ProfilePatch {
            biography: Some("Hello".to_string()),
            ..Default::default()
        });

        assert_eq!(profile.username, "alice");
        assert_eq!(profile.biography, "Hello");
    }

    #[test]
    fn test_patch_normalization() {
        let patch = ProfilePatch {
            username: Some("  Alice\u{FF01}  ".to_string()),
            biography: None,
        };
        let normalized = patch.normalized().unwrap();
        // NFKC folds the fullwidth exclamation mark, trim drops padding
        assert_eq!(normalized.username.as_deref(), Some("Alice!"));
    }

    #[test]
    fn test_patch_rejects_empty_and_blank() {
        assert!(ProfilePatch::default().normalized().is_err());

        let blank = ProfilePatch {
            username: Some("   ".to_string()),
            biography: None,
        };
        assert!(blank.normalized().is_err());
    }
}
