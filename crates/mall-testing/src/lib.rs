//! Test utilities for mall services.
//!
//! Provides `MockAuth` for signed `Authorization` headers and cart cookie helpers.
//! Import from tests only.

pub mod auth;
