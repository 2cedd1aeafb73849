//! # Policy Q&A
//!
//! This crate answers a new employee's questions about a company policy document using a
//! hosted generative model. It provides the prompt template and context budget, the
//! model-provider seam with a Gemini implementation, and the answer client that walks an
//! ordered list of model candidates.

pub mod answer;
pub mod constants;
pub mod errors;
pub mod prompts;
pub mod providers;

pub use answer::{Answer, AnswerService};
pub use errors::{AnswerError, ModelError};
