//! Session Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - entities, value objects, boundary traits
//! - `application/` - identity resolution and the session store
//! - `infra/` - boundary implementations (in-memory, PostgreSQL)
//!
//! ## Features
//! - Session bootstrap against the remote auth service
//! - First-sign-in profile provisioning with bounded lookups
//! - Event-driven state: Unresolved -> Resolving -> Authenticated/Anonymous
//! - Profile updates through typed patches
//!
//! ## Consistency Model
//! - Identity resolution never fails outward; when profile storage is
//!   slow or unreachable, an in-memory default profile stands in
//! - Failures while applying a session change collapse to Anonymous
//!   rather than leaving a stale Authenticated state
//! - Concurrent first-sign-in provisioning is absorbed: the storage
//!   uniqueness constraint rejects the second insert, first row wins

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::ResolverConfig;
pub use application::resolver::IdentityResolver;
pub use application::store::{SessionState, SessionStore};
pub use domain::boundary::{
    AuthGateway, OauthProvider, ProfileStore, SessionEvent, SessionEventKind,
};
pub use domain::entity::principal::Principal;
pub use domain::entity::profile::{Profile, ProfilePatch};
pub use domain::entity::resolved_user::ResolvedUser;
pub use domain::value_object::email::Email;
pub use error::{SessionError, SessionResult};
pub use infra::memory::{MemoryAuthGateway, MemoryProfileStore};
pub use infra::postgres::PgProfileStore;

// Re-export kernel types for unified error handling and ids
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};
pub use kernel::id::UserId;
