//! Filename validation for the create-document form.

use thiserror::Error;

/// Extensions a document may carry. Matching is substring containment, not
/// suffix matching, kept for compatibility with the behavior users already
/// rely on: `foo.txtbar` is accepted.
pub const RECOGNIZED_EXTENSIONS: [&str; 2] = [".txt", ".md"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("A name is required.")]
    Missing,

    #[error("Please include the filename extension (.txt or .md)")]
    MissingExtension,

    #[error("Filename cannot contain path separators.")]
    PathSeparators,
}

/// Checks a proposed document name. The first failing rule wins.
pub fn validate_filename(name: &str) -> Result<(), FilenameError> {
    if name.is_empty() {
        return Err(FilenameError::Missing);
    }

    if !RECOGNIZED_EXTENSIONS.iter().any(|ext| name.contains(ext)) {
        return Err(FilenameError::MissingExtension);
    }

    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(FilenameError::PathSeparators);
    }

    Ok(())
}
