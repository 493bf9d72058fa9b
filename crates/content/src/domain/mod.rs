//! Domain Layer
//!
//! Contains entities, value objects, and the boundary trait.

pub mod boundary;
pub mod entity;
pub mod value_object;

// Re-exports
pub use boundary::{ContentStore, ToggleOutcome};
pub use entity::{
    comment::Comment,
    post::{Post, PostDetail},
};
pub use value_object::{
    draft::{PostDraft, PostPatch},
    ids::{CommentId, PostId},
    query::{PostFilter, PostSort},
};
