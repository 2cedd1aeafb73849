//! Loading the policy document from disk.

use crate::errors::DocumentError;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// File name of the policy document, expected next to the running executable.
pub const POLICY_FILE_NAME: &str = "policy.pdf";

/// The policy document's bytes, read fresh for each use.
#[derive(Debug, Clone)]
pub struct PolicyDocument {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl PolicyDocument {
    /// Reads the document at `path`.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        if !path.is_file() {
            return Err(DocumentError::Missing(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DocumentError::Missing(path.to_path_buf())
            } else {
                DocumentError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        debug!(bytes = bytes.len(), "Loaded policy document");
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// The fixed location of the policy document: next to the running executable, or in the
/// working directory when the executable's location cannot be resolved.
pub fn default_document_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(POLICY_FILE_NAME)
}
