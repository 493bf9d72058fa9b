//! Content Use Cases
//!
//! Stateless operations over the content store. Each call is one
//! boundary round trip, plus one correlated membership read for the
//! two viewer-annotation cases.

use std::sync::Arc;

use crate::domain::boundary::{ContentStore, ToggleOutcome};
use crate::domain::entity::comment::Comment;
use crate::domain::entity::post::{Post, PostDetail};
use crate::domain::value_object::draft::{PostDraft, PostPatch};
use crate::domain::value_object::ids::PostId;
use crate::domain::value_object::query::PostFilter;
use crate::error::{ContentError, ContentResult};
use kernel::id::UserId;

/// Content service
///
/// Pass-through: store errors surface to the caller unretried, and no
/// authorization happens at this layer. Ownership checks on update and
/// delete are the caller's concern.
pub struct ContentService<S>
where
    S: ContentStore,
{
    store: Arc<S>,
}

impl<S> Clone for ContentService<S>
where
    S: ContentStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ContentService<S>
where
    S: ContentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List posts, annotated for the viewer
    ///
    /// Without a viewer every post reports `has_upvoted = false`. With
    /// one, a second query fetches membership for exactly the returned
    /// post ids.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        viewer: Option<&UserId>,
    ) -> ContentResult<Vec<Post>> {
        let mut posts = self.store.list_posts(filter).await?;

        if let Some(user_id) = viewer {
            if !posts.is_empty() {
                let ids: Vec<PostId> = posts.iter().map(|post| post.id).collect();
                let upvoted = self.store.upvoted_post_ids(&ids, user_id).await?;
                for post in &mut posts {
                    post.has_upvoted = upvoted.contains(&post.id);
                }
            }
        }

        Ok(posts)
    }

    /// Fetch one post with its comments, annotated for the viewer
    pub async fn get_post(
        &self,
        id: PostId,
        viewer: Option<&UserId>,
    ) -> ContentResult<PostDetail> {
        let mut detail = self
            .store
            .fetch_post(id)
            .await?
            .ok_or(ContentError::PostNotFound(id))?;

        if let Some(user_id) = viewer {
            detail.post.has_upvoted = self.store.has_upvoted(id, user_id).await?;
        }

        Ok(detail)
    }

    /// Create a post owned by the author
    pub async fn create_post(&self, draft: PostDraft, author: &UserId) -> ContentResult<Post> {
        let draft = draft.validated()?;
        let post = self.store.insert_post(&draft, author).await?;
        tracing::info!(post_id = %post.id, author_id = %author, "Post created");
        Ok(post)
    }

    /// Partially update a post
    ///
    /// No ownership check happens here; callers verify authorship
    /// before invoking.
    pub async fn update_post(&self, id: PostId, patch: PostPatch) -> ContentResult<Post> {
        let patch = patch.validated()?;
        let post = self.store.update_post(id, &patch).await?;
        tracing::info!(post_id = %id, "Post updated");
        Ok(post)
    }

    /// Delete a post unconditionally
    pub async fn delete_post(&self, id: PostId) -> ContentResult<()> {
        self.store.delete_post(id).await?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Append a comment to a post
    pub async fn add_comment(
        &self,
        post_id: PostId,
        text: &str,
        author: &UserId,
    ) -> ContentResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ContentError::Validation(
                "Comment cannot be blank".to_string(),
            ));
        }

        let comment = self.store.insert_comment(post_id, text, author).await?;
        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// Flip the viewer's upvote on a post
    ///
    /// The flip is a single atomic operation at the store; this layer
    /// only relays the outcome. Callers re-fetch the post to observe
    /// the authoritative state.
    pub async fn toggle_upvote(
        &self,
        post_id: PostId,
        user_id: &UserId,
    ) -> ContentResult<ToggleOutcome> {
        let outcome = self.store.toggle_upvote(post_id, user_id).await?;
        tracing::debug!(
            post_id = %post_id,
            user_id = %user_id,
            upvoted = outcome.upvoted,
            upvotes = outcome.upvotes,
            "Upvote toggled"
        );
        Ok(outcome)
    }
}
