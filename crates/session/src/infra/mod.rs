//! Infrastructure Layer
//!
//! In-memory and PostgreSQL implementations of the boundary traits.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAuthGateway, MemoryProfileStore};
pub use postgres::PgProfileStore;
