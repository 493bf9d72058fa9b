//! In-Memory Boundary Implementation
//!
//! Process-local stand-in for the remote store's content collections,
//! used by tests and the demo binary. Semantics mirror the hosted
//! service: store-assigned monotonic ids, `(post_id, user_id)`
//! uniqueness for upvotes, and a counter kept in lockstep with
//! membership.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::boundary::{ContentStore, ToggleOutcome};
use crate::domain::entity::comment::Comment;
use crate::domain::entity::post::{Post, PostDetail};
use crate::domain::value_object::draft::{PostDraft, PostPatch};
use crate::domain::value_object::ids::{CommentId, PostId};
use crate::domain::value_object::query::{PostFilter, PostSort};
use crate::error::{ContentError, ContentResult};
use kernel::id::UserId;

#[derive(Default)]
struct Rows {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    upvotes: HashSet<(PostId, UserId)>,
}

/// In-memory content store
pub struct MemoryContentStore {
    rows: Mutex<Rows>,
    next_post_id: AtomicI64,
    next_comment_id: AtomicI64,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Rows::default()),
            next_post_id: AtomicI64::new(1),
            next_comment_id: AtomicI64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Rows> {
        self.rows.lock().expect("content rows lock poisoned")
    }

    /// Snapshot of all stored posts, unordered and unannotated
    pub fn snapshot(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    /// Number of stored comments across all posts
    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryContentStore {
    async fn list_posts(&self, filter: &PostFilter) -> ContentResult<Vec<Post>> {
        let rows = self.lock();
        let mut posts: Vec<Post> = rows
            .posts
            .iter()
            .filter(|post| match &filter.search {
                Some(needle) => post
                    .title
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                None => true,
            })
            .filter(|post| match &filter.author {
                Some(author) => post.author_id == *author,
                None => true,
            })
            .cloned()
            .collect();

        // Stable sort: ties keep insertion order, like an ordered scan.
        match filter.sort {
            PostSort::Popular => posts.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
            PostSort::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        Ok(posts)
    }

    async fn fetch_post(&self, id: PostId) -> ContentResult<Option<PostDetail>> {
        let rows = self.lock();
        let Some(post) = rows.posts.iter().find(|post| post.id == id).cloned() else {
            return Ok(None);
        };

        let mut comments: Vec<Comment> = rows
            .comments
            .iter()
            .filter(|comment| comment.post_id == id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(Some(PostDetail { post, comments }))
    }

    async fn insert_post(&self, draft: &PostDraft, author: &UserId) -> ContentResult<Post> {
        let post = Post {
            id: PostId::new(self.next_post_id.fetch_add(1, Ordering::SeqCst)),
            title: draft.title.clone(),
            content: draft.content.clone(),
            image_url: draft.image_url.clone(),
            author_id: *author,
            created_at: Utc::now(),
            upvotes: 0,
            has_upvoted: false,
        };
        self.lock().posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> ContentResult<Post> {
        let mut rows = self.lock();
        let Some(post) = rows.posts.iter_mut().find(|post| post.id == id) else {
            return Err(ContentError::PostNotFound(id));
        };

        if let Some(title) = &patch.title {
            post.title = title.clone();
        }
        if let Some(content) = &patch.content {
            post.content = Some(content.clone());
        }
        if let Some(image_url) = &patch.image_url {
            post.image_url = Some(image_url.clone());
        }

        Ok(post.clone())
    }

    async fn delete_post(&self, id: PostId) -> ContentResult<()> {
        // Comments and upvotes cascade with the post, as in the hosted
        // schema.
        let mut rows = self.lock();
        rows.posts.retain(|post| post.id != id);
        rows.comments.retain(|comment| comment.post_id != id);
        rows.upvotes.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }

    async fn insert_comment(
        &self,
        post_id: PostId,
        text: &str,
        author: &UserId,
    ) -> ContentResult<Comment> {
        let mut rows = self.lock();
        if !rows.posts.iter().any(|post| post.id == post_id) {
            return Err(ContentError::PostNotFound(post_id));
        }

        let comment = Comment {
            id: CommentId::new(self.next_comment_id.fetch_add(1, Ordering::SeqCst)),
            post_id,
            text: text.to_string(),
            author_id: *author,
            created_at: Utc::now(),
        };
        rows.comments.push(comment.clone());
        Ok(comment)
    }

    async fn upvoted_post_ids(
        &self,
        post_ids: &[PostId],
        user_id: &UserId,
    ) -> ContentResult<HashSet<PostId>> {
        let rows = self.lock();
        Ok(post_ids
            .iter()
            .copied()
            .filter(|post_id| rows.upvotes.contains(&(*post_id, *user_id)))
            .collect())
    }

    async fn has_upvoted(&self, post_id: PostId, user_id: &UserId) -> ContentResult<bool> {
        Ok(self.lock().upvotes.contains(&(post_id, *user_id)))
    }

    async fn toggle_upvote(
        &self,
        post_id: PostId,
        user_id: &UserId,
    ) -> ContentResult<ToggleOutcome> {
        let mut rows = self.lock();
        let Some(index) = rows.posts.iter().position(|post| post.id == post_id) else {
            return Err(ContentError::PostNotFound(post_id));
        };

        let key = (post_id, *user_id);
        let upvoted = if rows.upvotes.remove(&key) {
            rows.posts[index].upvotes -= 1;
            false
        } else {
            rows.upvotes.insert(key);
            rows.posts[index].upvotes += 1;
            true
        };

        Ok(ToggleOutcome {
            upvoted,
            upvotes: rows.posts[index].upvotes,
        })
    }
}
