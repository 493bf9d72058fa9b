//! Post Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::comment::Comment;
use crate::domain::value_object::ids::PostId;
use kernel::id::UserId;

/// A board post
///
/// `upvotes` is the store-maintained counter. `has_upvoted` is a
/// viewer-scoped annotation filled in by the application layer; it is
/// never persisted on the row and defaults to `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    /// Store-maintained upvote counter
    pub upvotes: i64,
    /// Whether the current viewer has upvoted this post
    #[serde(default)]
    pub has_upvoted: bool,
}

/// A post together with its comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}
