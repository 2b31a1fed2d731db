use std::path::{Component, Path, PathBuf};

/// Errors that can occur while resolving a storage key to a path.
#[derive(Debug, thiserror::Error)]
pub enum KeySecurityError {
    #[error("Storage key is empty")]
    Empty,

    #[error("Storage key '{key}' contains a path separator")]
    ContainsSeparator { key: String },

    #[error("Storage key '{key}' is not a plain file name")]
    NotAFileName { key: String },
}

/// Resolves a storage key to a file path directly inside `root`.
///
/// A key must be a single plain file name. Separators, `.` / `..` and
/// absolute paths are rejected so a caller-supplied identifier can never
/// address a file outside the storage root.
///
/// # Examples
///
/// ```rust,ignore
/// let path = validate_key(Path::new("/data/prompts"), "prompt-0a1b2c3d.json")?;
/// assert_eq!(path, PathBuf::from("/data/prompts/prompt-0a1b2c3d.json"));
/// ```
pub fn validate_key(root: &Path, key: &str) -> Result<PathBuf, KeySecurityError> {
    if key.is_empty() {
        return Err(KeySecurityError::Empty);
    }

    if key.contains('/') || key.contains('\\') {
        return Err(KeySecurityError::ContainsSeparator {
            key: key.to_string(),
        });
    }

    let mut components = Path::new(key).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(root.join(key)),
        _ => Err(KeySecurityError::NotAFileName {
            key: key.to_string(),
        }),
    }
}
