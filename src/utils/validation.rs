//! Centralized validation and helper functions.

use std::path::{Path, PathBuf};

/// Repeat classes that carry no usable family information. Hits to these are
/// dropped before classification.
pub const EXCLUDED_CLASSES: [&str; 5] = ["Simple_repeat", "Satellite", "snRNA", "Unknown", "rRNA"];

/// Maximum length of a round name (it becomes a directory and file stem)
pub const MAX_ROUND_NAME_LENGTH: usize = 255;

/// Whether a class root is on the exclusion denylist.
///
/// # Examples
///
/// ```
/// use rep_classifier::utils::validation::is_excluded_class;
///
/// assert!(is_excluded_class("Satellite"));
/// assert!(!is_excluded_class("LINE"));
/// assert!(!is_excluded_class("satellite")); // case-sensitive
/// ```
#[must_use]
pub fn is_excluded_class(class_root: &str) -> bool {
    EXCLUDED_CLASSES.contains(&class_root)
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Invalid round name '{0}': must be a plain, non-empty file name")]
    InvalidRoundName(String),
    #[error("Thread count must be at least 1")]
    ZeroThreads,
}

/// Fail early if an input path does not point at a regular file
///
/// # Errors
///
/// Returns `ValidationError::MissingFile` if `path` is not an existing file.
pub fn require_file(path: &Path) -> Result<(), ValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ValidationError::MissingFile(path.to_path_buf()))
    }
}

/// Check that a round name is usable as a single path component
///
/// # Errors
///
/// Returns `ValidationError::InvalidRoundName` if the name is empty, too long,
/// contains a path separator, is `.`/`..`, or contains control characters.
pub fn validate_round_name(name: &str) -> Result<(), ValidationError> {
    let invalid = name.trim().is_empty()
        || name.len() > MAX_ROUND_NAME_LENGTH
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.chars().any(char::is_control);

    if invalid {
        Err(ValidationError::InvalidRoundName(name.to_string()))
    } else {
        Ok(())
    }
}

/// # Errors
///
/// Returns `ValidationError::ZeroThreads` for a zero thread count.
pub fn validate_threads(threads: usize) -> Result<(), ValidationError> {
    if threads == 0 {
        Err(ValidationError::ZeroThreads)
    } else {
        Ok(())
    }
}
