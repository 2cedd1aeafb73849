//! # Route Handlers
//!
//! The Axum handlers for `onboard-server`: the onboarding page itself, and the small
//! endpoints around it (document download, PWA manifest, health check).

pub mod general;
pub mod onboarding;

pub use general::*;
pub use onboarding::*;

// Shared items used by the handler modules.
use super::{errors::AppError, state::AppState};
