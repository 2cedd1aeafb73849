//! # onboard-pdf: Policy Document Extraction
//!
//! Loads the policy PDF and pulls out the two things the onboarding page needs from it:
//! the tables, one per page at most, and the plain text used as Q&A context. The two
//! extractors open the document independently and never fail outright; problems come
//! back as warnings next to whatever could be extracted.

pub mod document;
pub mod errors;
pub mod fonts;
pub mod layout;
pub mod tables;
pub mod text;

pub use document::{default_document_path, PolicyDocument, POLICY_FILE_NAME};
pub use errors::{DocumentError, ExtractError};
pub use tables::{extract_tables, ExtractedTable, TableExtraction};
pub use text::{extract_text, TextExtraction};
