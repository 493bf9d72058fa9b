//! Application Layer
//!
//! Stateless content use cases.

pub mod service;

// Re-exports
pub use service::ContentService;
