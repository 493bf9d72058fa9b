//! Comment Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::ids::{CommentId, PostId};
use kernel::id::UserId;

/// A comment on a post
///
/// Append-only: comments are never edited or deleted individually,
/// they only go away with their post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub text: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}
