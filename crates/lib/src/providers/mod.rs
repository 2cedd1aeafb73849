//! # Providers
//!
//! Clients for external services the answer client depends on.

pub mod ai;
