//! Infrastructure Layer
//!
//! In-memory and PostgreSQL implementations of the boundary trait.

pub mod memory;
pub mod postgres;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;
