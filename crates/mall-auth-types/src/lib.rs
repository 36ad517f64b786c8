//! Auth types shared across mall services.
//!
//! Provides JWT issue/validation, the `AuthUser` extractor, and the anonymous
//! cart cookie codec consumed at login.

pub mod cookie;
pub mod identity;
pub mod token;
