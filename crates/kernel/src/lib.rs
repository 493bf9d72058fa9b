//! Shared Kernel - vocabulary common to every layer
//!
//! The smallest set of types the session and content crates agree on:
//! - A unified error type, its classification, and result aliases
//! - Typed ID wrappers keyed to the remote store's UUID identities
//!
//! Anything that belongs to a single domain stays out of this crate;
//! only meanings that must stay identical across all of them live here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
