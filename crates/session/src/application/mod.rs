//! Application Layer
//!
//! Identity resolution and session state management.

pub mod config;
pub mod resolver;
pub mod store;

// Re-exports
pub use config::ResolverConfig;
pub use resolver::IdentityResolver;
pub use store::{SessionState, SessionStore};
