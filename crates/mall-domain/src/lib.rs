//! Domain types shared across all mall services.
//!
//! This crate contains only pure types with no framework dependencies:
//! typed identifiers and account field validators.

pub mod id;
pub mod user;
