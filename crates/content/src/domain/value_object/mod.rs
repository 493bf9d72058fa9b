//! Value Object Module

pub mod draft;
pub mod ids;
pub mod query;
