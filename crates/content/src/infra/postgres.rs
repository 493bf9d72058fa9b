//! PostgreSQL Boundary Implementation
//!
//! Talks to the board schema owned by the remote store (`posts`,
//! `comments`, `upvotes`). The schema is treated as fixed; no
//! migrations are managed here.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::boundary::{ContentStore, ToggleOutcome};
use crate::domain::entity::comment::Comment;
use crate::domain::entity::post::{Post, PostDetail};
use crate::domain::value_object::draft::{PostDraft, PostPatch};
use crate::domain::value_object::ids::{CommentId, PostId};
use crate::domain::value_object::query::{PostFilter, PostSort};
use crate::error::{ContentError, ContentResult};
use kernel::id::UserId;

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContentStore for PgContentStore {
    async fn list_posts(&self, filter: &PostFilter) -> ContentResult<Vec<Post>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT id, title, content, image_url, author_id, created_at, upvotes FROM posts",
        );

        let mut clause = " WHERE ";
        if let Some(search) = &filter.search {
            query.push(clause).push("title ILIKE ");
            query.push_bind(format!("%{search}%"));
            clause = " AND ";
        }
        if let Some(author) = &filter.author {
            query.push(clause).push("author_id = ");
            query.push_bind(*author.as_uuid());
        }

        query.push(match filter.sort {
            PostSort::Popular => " ORDER BY upvotes DESC",
            PostSort::Newest => " ORDER BY created_at DESC",
        });

        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn fetch_post(&self, id: PostId) -> ContentResult<Option<PostDetail>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, image_url, author_id, created_at, upvotes
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, text, author_id, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PostDetail {
            post: row.into_post(),
            comments: comments.into_iter().map(CommentRow::into_comment).collect(),
        }))
    }

    async fn insert_post(&self, draft: &PostDraft, author: &UserId) -> ContentResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, image_url, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, image_url, author_id, created_at, upvotes
            "#,
        )
        .bind(&draft.title)
        .bind(draft.content.as_deref())
        .bind(draft.image_url.as_deref())
        .bind(author.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post())
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> ContentResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                image_url = COALESCE($4, image_url)
            WHERE id = $1
            RETURNING id, title, content, image_url, author_id, created_at, upvotes
            "#,
        )
        .bind(id.as_i64())
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .bind(patch.image_url.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PostRow::into_post)
            .ok_or(ContentError::PostNotFound(id))
    }

    async fn delete_post(&self, id: PostId) -> ContentResult<()> {
        // Comments and upvotes cascade with the row.
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_comment(
        &self,
        post_id: PostId,
        text: &str,
        author: &UserId,
    ) -> ContentResult<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post_id, text, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, text, author_id, created_at
            "#,
        )
        .bind(post_id.as_i64())
        .bind(text)
        .bind(author.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| classify_missing_post(err, post_id))?;

        Ok(row.into_comment())
    }

    async fn upvoted_post_ids(
        &self,
        post_ids: &[PostId],
        user_id: &UserId,
    ) -> ContentResult<HashSet<PostId>> {
        let ids: Vec<i64> = post_ids.iter().map(PostId::as_i64).collect();

        let rows: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT post_id
            FROM upvotes
            WHERE user_id = $1 AND post_id = ANY($2)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostId::new).collect())
    }

    async fn has_upvoted(&self, post_id: PostId, user_id: &UserId) -> ContentResult<bool> {
        let upvoted = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM upvotes WHERE post_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(post_id.as_i64())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(upvoted)
    }

    /// Membership flip and counter update commit together; an early
    /// return rolls both back.
    async fn toggle_upvote(
        &self,
        post_id: PostId,
        user_id: &UserId,
    ) -> ContentResult<ToggleOutcome> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM upvotes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id.as_i64())
            .bind(user_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let upvoted = if removed == 0 {
            sqlx::query("INSERT INTO upvotes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id.as_i64())
                .bind(user_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|err| classify_missing_post(err, post_id))?;
            true
        } else {
            false
        };

        let delta: i64 = if upvoted { 1 } else { -1 };
        let upvotes = sqlx::query_scalar::<_, i64>(
            "UPDATE posts SET upvotes = upvotes + $2 WHERE id = $1 RETURNING upvotes",
        )
        .bind(post_id.as_i64())
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ContentError::PostNotFound(post_id))?;

        tx.commit().await?;

        Ok(ToggleOutcome { upvoted, upvotes })
    }
}

/// Surface a missing-post foreign key violation as a typed not-found
fn classify_missing_post(err: sqlx::Error, post_id: PostId) -> ContentError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23503") {
            return ContentError::PostNotFound(post_id);
        }
    }
    ContentError::Database(err)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: Option<String>,
    image_url: Option<String>,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    upvotes: i64,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: PostId::new(self.id),
            title: self.title,
            content: self.content,
            image_url: self.image_url,
            author_id: UserId::from_uuid(self.author_id),
            created_at: self.created_at,
            upvotes: self.upvotes,
            // Annotation happens in the application layer.
            has_upvoted: false,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    text: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::new(self.id),
            post_id: PostId::new(self.post_id),
            text: self.text,
            author_id: UserId::from_uuid(self.author_id),
            created_at: self.created_at,
        }
    }
}
