//! Content Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - entities, value objects, the boundary trait
//! - `application/` - stateless content use cases
//! - `infra/` - boundary implementations (in-memory, PostgreSQL)
//!
//! ## Features
//! - Post listing with search, author filter, and newest/popular order
//! - Single-post fetch joined with comments
//! - Post create/update/delete through typed drafts and patches
//! - Comment append
//! - Atomic per-(post, user) upvote toggle with a synchronized counter
//!
//! ## Consistency Model
//! - Every operation is a boundary round trip; results come from the
//!   store, never from an optimistic local mutation
//! - `has_upvoted` is a viewer-scoped annotation resolved by one extra
//!   membership read; a missing membership row means "not upvoted"
//! - The upvote toggle is atomic at the store, so concurrent togglers
//!   cannot produce lost counter updates
//! - No authorization here: ownership checks on update and delete
//!   belong to the caller

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::service::ContentService;
pub use domain::boundary::{ContentStore, ToggleOutcome};
pub use domain::entity::comment::Comment;
pub use domain::entity::post::{Post, PostDetail};
pub use domain::value_object::draft::{PostDraft, PostPatch};
pub use domain::value_object::ids::{CommentId, PostId};
pub use domain::value_object::query::{PostFilter, PostSort};
pub use error::{ContentError, ContentResult};
pub use infra::memory::MemoryContentStore;
pub use infra::postgres::PgContentStore;

// Re-export kernel types for unified error handling and ids
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::id::UserId;

#[cfg(test)]
mod tests;
