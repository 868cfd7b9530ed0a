//! Error types for the prompt file and the prompt store
//!
//! Both enums are recovered at the user action that triggered them and shown
//! as a single notice; nothing here is meant to abort the application.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing `promptData.json`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The prompt file does not exist yet.
    #[error("Prompt file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not valid JSON.
    #[error("Could not decode '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but not an object of strings.
    #[error("Unexpected format in '{}': expected a JSON dictionary, found {found}", .path.display())]
    Shape { path: PathBuf, found: String },

    /// Reading or writing the file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the file simply has not been created yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failures of prompt store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Prompt '{0}' not found")]
    NotFound(String),

    #[error("Prompt name cannot be empty")]
    EmptyName,

    #[error("Prompt body cannot be empty")]
    EmptyBody,

    #[error("Prompt name '{0}' already exists")]
    Duplicate(String),

    /// Persisting the mutation failed; the in-memory mapping was rolled back.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Short dialog title for this error.
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyBody | Self::Duplicate(_) => "Validation Error",
            Self::NotFound(_) => "Error",
            Self::Storage(_) => "Storage Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_messages_name_the_file() {
        let err = StorageError::NotFound(PathBuf::from("/tmp/prompts/promptData.json"));
        assert!(err.to_string().contains("promptData.json"));
        assert!(err.is_not_found());

        let err = StorageError::Shape {
            path: PathBuf::from("promptData.json"),
            found: "an array".to_string(),
        };
        assert!(err.to_string().contains("found an array"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_store_error_titles() {
        assert_eq!(StoreError::EmptyName.title(), "Validation Error");
        assert_eq!(StoreError::Duplicate("A".into()).title(), "Validation Error");
        assert_eq!(StoreError::NotFound("A".into()).title(), "Error");

        let storage = StorageError::NotFound(PathBuf::from("x"));
        assert_eq!(StoreError::from(storage).title(), "Storage Error");
    }
}
