//! Unit tests for the content crate
//!
//! Covers listing and annotation, post/comment writes, the upvote
//! toggle, and the error surface, all against the in-memory store.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::application::service::ContentService;
    use crate::domain::entity::post::Post;
    use crate::domain::value_object::draft::PostDraft;
    use crate::infra::memory::MemoryContentStore;
    use kernel::id::UserId;

    pub fn service() -> (Arc<MemoryContentStore>, ContentService<MemoryContentStore>) {
        let store = Arc::new(MemoryContentStore::new());
        let service = ContentService::new(Arc::clone(&store));
        (store, service)
    }

    /// Create posts in order, spreading creation times so "newest"
    /// ordering is deterministic
    pub async fn seed_posts(
        service: &ContentService<MemoryContentStore>,
        author: &UserId,
        titles: &[&str],
    ) -> Vec<Post> {
        let mut posts = Vec::new();
        for title in titles {
            if !posts.is_empty() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
            posts.push(
                service
                    .create_post(PostDraft::new(*title), author)
                    .await
                    .unwrap(),
            );
        }
        posts
    }
}

#[cfg(test)]
mod service_tests {
    use std::time::Duration;

    use super::support;
    use crate::domain::value_object::draft::{PostDraft, PostPatch};
    use crate::domain::value_object::ids::PostId;
    use crate::domain::value_object::query::PostFilter;
    use crate::error::ContentError;
    use kernel::id::UserId;

    #[tokio::test]
    async fn test_create_post_returns_persisted_row() {
        let (store, service) = support::service();
        let author = UserId::new();

        let post = service
            .create_post(
                PostDraft::new("  First post  ").with_content("hello"),
                &author,
            )
            .await
            .unwrap();

        assert_eq!(post.title, "First post");
        assert_eq!(post.content.as_deref(), Some("hello"));
        assert_eq!(post.author_id, author);
        assert_eq!(post.upvotes, 0);
        assert!(!post.has_upvoted);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_title() {
        let (store, service) = support::service();

        let err = service
            .create_post(PostDraft::new("   "), &UserId::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::Validation(_)));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_store, service) = support::service();
        let author = UserId::new();
        support::seed_posts(&service, &author, &["first", "second", "third"]).await;

        let posts = service
            .list_posts(&PostFilter::newest(), None)
            .await
            .unwrap();

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
        assert!(
            posts
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    }

    #[tokio::test]
    async fn test_list_popular_orders_by_upvotes() {
        let (_store, service) = support::service();
        let author = UserId::new();
        let posts = support::seed_posts(&service, &author, &["a", "b", "c"]).await;

        // b gets two votes, c one, a none.
        for voter in [UserId::new(), UserId::new()] {
            service.toggle_upvote(posts[1].id, &voter).await.unwrap();
        }
        service
            .toggle_upvote(posts[2].id, &UserId::new())
            .await
            .unwrap();

        let listed = service
            .list_posts(&PostFilter::popular(), None)
            .await
            .unwrap();

        let counts: Vec<i64> = listed.iter().map(|p| p.upvotes).collect();
        assert_eq!(counts, vec![2, 1, 0]);
        assert_eq!(listed[0].title, "b");
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive() {
        let (_store, service) = support::service();
        let author = UserId::new();
        support::seed_posts(
            &service,
            &author,
            &["Rust tips", "Cooking", "rustacean corner"],
        )
        .await;

        let posts = service
            .list_posts(&PostFilter::newest().with_search("RUST"), None)
            .await
            .unwrap();

        assert_eq!(posts.len(), 2);
        assert!(
            posts
                .iter()
                .all(|p| p.title.to_lowercase().contains("rust"))
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_author() {
        let (_store, service) = support::service();
        let alice = UserId::new();
        let bob = UserId::new();
        support::seed_posts(&service, &alice, &["one", "two"]).await;
        support::seed_posts(&service, &bob, &["three"]).await;

        let posts = service
            .list_posts(&PostFilter::newest().by_author(alice), None)
            .await
            .unwrap();

        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.author_id == alice));
    }

    #[tokio::test]
    async fn test_list_annotates_upvotes_for_viewer() {
        let (_store, service) = support::service();
        let author = UserId::new();
        let posts = support::seed_posts(&service, &author, &["a", "b"]).await;

        let alice = UserId::new();
        service.toggle_upvote(posts[0].id, &alice).await.unwrap();

        // Signed-out listing reports no membership at all.
        let anon = service
            .list_posts(&PostFilter::newest(), None)
            .await
            .unwrap();
        assert!(anon.iter().all(|p| !p.has_upvoted));

        // Newest first, so "b" precedes the upvoted "a".
        let seen = service
            .list_posts(&PostFilter::newest(), Some(&alice))
            .await
            .unwrap();
        let upvoted: Vec<bool> = seen.iter().map(|p| p.has_upvoted).collect();
        assert_eq!(upvoted, vec![false, true]);

        let bob = UserId::new();
        let other = service
            .list_posts(&PostFilter::newest(), Some(&bob))
            .await
            .unwrap();
        assert!(other.iter().all(|p| !p.has_upvoted));
    }

    #[tokio::test]
    async fn test_get_post_returns_comments_oldest_first() {
        let (_store, service) = support::service();
        let author = UserId::new();
        let post = service
            .create_post(PostDraft::new("Discussion"), &author)
            .await
            .unwrap();

        service
            .add_comment(post.id, "first comment", &author)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        service
            .add_comment(post.id, "second comment", &author)
            .await
            .unwrap();

        let detail = service.get_post(post.id, None).await.unwrap();

        assert_eq!(detail.post.id, post.id);
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].text, "first comment");
        assert_eq!(detail.comments[1].text, "second comment");
    }

    #[tokio::test]
    async fn test_get_post_annotates_viewer_membership() {
        let (_store, service) = support::service();
        let author = UserId::new();
        let post = service
            .create_post(PostDraft::new("Voted"), &author)
            .await
            .unwrap();

        let alice = UserId::new();
        service.toggle_upvote(post.id, &alice).await.unwrap();

        let seen = service.get_post(post.id, Some(&alice)).await.unwrap();
        assert!(seen.post.has_upvoted);
        assert_eq!(seen.post.upvotes, 1);

        let anon = service.get_post(post.id, None).await.unwrap();
        assert!(!anon.post.has_upvoted);
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let (_store, service) = support::service();

        let err = service
            .get_post(PostId::new(999), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::PostNotFound(id) if id == PostId::new(999)));
    }

    #[tokio::test]
    async fn test_update_post_merges_patch_fields() {
        let (_store, service) = support::service();
        let author = UserId::new();
        let post = service
            .create_post(PostDraft::new("Original").with_content("body"), &author)
            .await
            .unwrap();

        let updated = service
            .update_post(
                post.id,
                PostPatch {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content.as_deref(), Some("body"));
        assert_eq!(updated.author_id, author);

        let detail = service.get_post(post.id, None).await.unwrap();
        assert_eq!(detail.post.title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_post_rejects_empty_patch() {
        let (_store, service) = support::service();
        let post = service
            .create_post(PostDraft::new("Original"), &UserId::new())
            .await
            .unwrap();

        let err = service
            .update_post(post.id, PostPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let (_store, service) = support::service();

        let err = service
            .update_post(
                PostId::new(999),
                PostPatch {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_post_performs_no_ownership_check() {
        let (_store, service) = support::service();
        let alice = UserId::new();
        let post = service
            .create_post(PostDraft::new("Alice's post"), &alice)
            .await
            .unwrap();

        // The service accepts the edit no matter who asks; verifying
        // authorship is the caller's responsibility.
        let updated = service
            .update_post(
                post.id,
                PostPatch {
                    title: Some("Edited by someone else".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Edited by someone else");
        assert_eq!(updated.author_id, alice);
    }

    #[tokio::test]
    async fn test_delete_post_then_fetch_is_not_found() {
        let (store, service) = support::service();
        let author = UserId::new();
        let post = service
            .create_post(PostDraft::new("Ephemeral"), &author)
            .await
            .unwrap();
        service
            .add_comment(post.id, "gone with the post", &author)
            .await
            .unwrap();

        service.delete_post(post.id).await.unwrap();

        let err = service.get_post(post.id, None).await.unwrap_err();
        assert!(matches!(err, ContentError::PostNotFound(_)));
        assert!(store.snapshot().is_empty());
        assert_eq!(store.comment_count(), 0);
    }

    #[tokio::test]
    async fn test_add_comment_rejects_blank_text() {
        let (_store, service) = support::service();
        let author = UserId::new();
        let post = service
            .create_post(PostDraft::new("Quiet"), &author)
            .await
            .unwrap();

        let err = service
            .add_comment(post.id, "   ", &author)
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_comment_to_missing_post_is_not_found() {
        let (_store, service) = support::service();

        let err = service
            .add_comment(PostId::new(999), "hello?", &UserId::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::PostNotFound(_)));
    }
}

#[cfg(test)]
mod upvote_tests {
    use super::support;
    use crate::domain::boundary::ToggleOutcome;
    use crate::domain::value_object::draft::PostDraft;
    use crate::domain::value_object::ids::PostId;
    use crate::error::ContentError;
    use kernel::id::UserId;

    #[tokio::test]
    async fn test_toggle_is_an_involution() {
        let (_store, service) = support::service();
        let post = service
            .create_post(PostDraft::new("Vote me"), &UserId::new())
            .await
            .unwrap();
        let alice = UserId::new();

        let first = service.toggle_upvote(post.id, &alice).await.unwrap();
        assert_eq!(
            first,
            ToggleOutcome {
                upvoted: true,
                upvotes: 1
            }
        );
        let seen = service.get_post(post.id, Some(&alice)).await.unwrap();
        assert!(seen.post.has_upvoted);
        assert_eq!(seen.post.upvotes, 1);

        let second = service.toggle_upvote(post.id, &alice).await.unwrap();
        assert_eq!(
            second,
            ToggleOutcome {
                upvoted: false,
                upvotes: 0
            }
        );
        let seen = service.get_post(post.id, Some(&alice)).await.unwrap();
        assert!(!seen.post.has_upvoted);
        assert_eq!(seen.post.upvotes, 0);
    }

    #[tokio::test]
    async fn test_toggle_tracks_users_independently() {
        let (_store, service) = support::service();
        let post = service
            .create_post(PostDraft::new("Contested"), &UserId::new())
            .await
            .unwrap();
        let alice = UserId::new();
        let bob = UserId::new();

        service.toggle_upvote(post.id, &alice).await.unwrap();
        let outcome = service.toggle_upvote(post.id, &bob).await.unwrap();
        assert_eq!(outcome.upvotes, 2);

        // Alice withdrawing must not disturb Bob's membership.
        let outcome = service.toggle_upvote(post.id, &alice).await.unwrap();
        assert_eq!(outcome.upvotes, 1);
        assert!(!outcome.upvoted);

        let bobs_view = service.get_post(post.id, Some(&bob)).await.unwrap();
        assert!(bobs_view.post.has_upvoted);
        let alices_view = service.get_post(post.id, Some(&alice)).await.unwrap();
        assert!(!alices_view.post.has_upvoted);
    }

    #[tokio::test]
    async fn test_toggle_missing_post_is_not_found() {
        let (_store, service) = support::service();

        let err = service
            .toggle_upvote(PostId::new(999), &UserId::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::PostNotFound(_)));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::value_object::ids::PostId;
    use crate::error::ContentError;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_error_kinds() {
        let cases: Vec<(ContentError, ErrorKind)> = vec![
            (
                ContentError::PostNotFound(PostId::new(1)),
                ErrorKind::NotFound,
            ),
            (
                ContentError::Validation("blank".to_string()),
                ErrorKind::BadRequest,
            ),
            (
                ContentError::Database(sqlx::Error::WorkerCrashed),
                ErrorKind::InternalServerError,
            ),
            (
                ContentError::Boundary("down".to_string()),
                ErrorKind::ServiceUnavailable,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.kind(), expected, "kind mismatch for {error}");
        }
    }

    #[test]
    fn test_into_app_error_carries_kind_and_message() {
        let err = ContentError::PostNotFound(PostId::new(7)).into_app_error();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Post 7 not found");
    }

    #[test]
    fn test_database_error_classifies_through_kernel() {
        let err = ContentError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);

        let app_err = err.into_app_error();
        assert_eq!(app_err.status_code(), 503);
        assert!(std::error::Error::source(&app_err).is_some());
    }
}
