//! Domain Layer
//!
//! Contains entities, value objects, and boundary traits.

pub mod boundary;
pub mod entity;
pub mod value_object;

// Re-exports
pub use boundary::{AuthGateway, ProfileStore, SessionEvent, SessionEventKind};
pub use entity::{principal::Principal, profile::Profile, resolved_user::ResolvedUser};
