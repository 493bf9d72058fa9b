//! Content Row Identifiers
//!
//! Posts and comments are keyed by store-assigned numeric ids, unlike
//! the uuid-keyed identities in `kernel::id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Post row id
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<PostId> for i64 {
    fn from(id: PostId) -> Self {
        id.0
    }
}

/// Comment row id
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CommentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CommentId> for i64 {
    fn from(id: CommentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let post: PostId = 7.into();
        let comment: CommentId = 7.into();

        // Same numeric value, different types; only the raw values
        // can be compared.
        assert_eq!(post.as_i64(), comment.as_i64());
    }

    #[test]
    fn test_id_display_is_bare_number() {
        assert_eq!(PostId::new(42).to_string(), "42");
        assert_eq!(i64::from(CommentId::new(42)), 42);
    }
}
