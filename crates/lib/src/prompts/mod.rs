//! # Prompt Templates
//!
//! Prompt templates used by the answer client, grouped by purpose.

pub mod policy;
