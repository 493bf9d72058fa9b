//! Entity Module

pub mod principal;
pub mod profile;
pub mod resolved_user;
