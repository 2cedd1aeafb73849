//! # Shared Constants
//!
//! Values shared between the library and the server crate. The model candidate list
//! here only seeds the configuration defaults; deployments override it.

/// Maximum number of document characters placed in a prompt.
pub const CONTEXT_CHAR_BUDGET: usize = 8000;

/// Base URL of the Gemini REST API.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the Gemini credential.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Default ordered model candidates, newest and cheapest first.
pub const DEFAULT_MODEL_CANDIDATES: &[&str] = &[
    "models/gemini-2.5-flash",
    "models/gemini-2.5-pro",
    "models/gemini-flash-latest",
    "models/gemini-pro-latest",
    "models/gemini-2.0-flash",
    "gemini-1.5-flash",
];

/// File name offered to the browser when the policy document is downloaded.
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "公司政策手冊.pdf";
