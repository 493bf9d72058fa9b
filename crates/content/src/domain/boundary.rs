//! Boundary Trait
//!
//! Interface to the remote store's content collections (posts,
//! comments, upvotes). Implementations are in the infrastructure
//! layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::entity::comment::Comment;
use crate::domain::entity::post::{Post, PostDetail};
use crate::domain::value_object::draft::{PostDraft, PostPatch};
use crate::domain::value_object::ids::PostId;
use crate::domain::value_object::query::PostFilter;
use crate::error::ContentResult;
use kernel::id::UserId;

/// Result of the store's atomic upvote toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// Viewer's membership after the flip
    pub upvoted: bool,
    /// Post counter after the flip
    pub upvotes: i64,
}

/// Content store trait
///
/// Rows come back unannotated: `has_upvoted` is always `false` here
/// and is filled in by the application layer from the membership
/// queries.
#[trait_variant::make(ContentStore: Send)]
pub trait LocalContentStore {
    /// List posts matching the filter, in the filter's order
    async fn list_posts(&self, filter: &PostFilter) -> ContentResult<Vec<Post>>;

    /// Fetch one post joined with its comments, oldest comment first
    async fn fetch_post(&self, id: PostId) -> ContentResult<Option<PostDetail>>;

    /// Insert a new post owned by `author`
    ///
    /// The store assigns the id and timestamp; the returned row is the
    /// persisted one.
    async fn insert_post(&self, draft: &PostDraft, author: &UserId) -> ContentResult<Post>;

    /// Apply a patch to an existing post
    ///
    /// Returns `ContentError::PostNotFound` when the row is absent.
    async fn update_post(&self, id: PostId, patch: &PostPatch) -> ContentResult<Post>;

    /// Delete a post unconditionally
    async fn delete_post(&self, id: PostId) -> ContentResult<()>;

    /// Insert a comment on a post
    async fn insert_comment(
        &self,
        post_id: PostId,
        text: &str,
        author: &UserId,
    ) -> ContentResult<Comment>;

    /// Upvote membership for a viewer over exactly the given posts
    async fn upvoted_post_ids(
        &self,
        post_ids: &[PostId],
        user_id: &UserId,
    ) -> ContentResult<HashSet<PostId>>;

    /// Whether the viewer has upvoted the post
    ///
    /// A missing membership row is `false`, never an error.
    async fn has_upvoted(&self, post_id: PostId, user_id: &UserId) -> ContentResult<bool>;

    /// Atomically flip the (post, user) upvote membership and adjust
    /// the post's counter in the same operation
    async fn toggle_upvote(&self, post_id: PostId, user_id: &UserId)
    -> ContentResult<ToggleOutcome>;
}
