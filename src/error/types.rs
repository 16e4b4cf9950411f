//! Error types
//!
//! Defines the domain error taxonomy returned by every sandboxed storage
//! operation.

use std::fmt;
use std::io;

/// Storage module errors
///
/// Path payloads are always the client-relative path as it was requested,
/// never the absolute location under the sandbox root.
#[derive(Debug)]
pub enum StorageError {
    InvalidPath(String),
    InvalidFile(String),
    DirExists(String),
    DirNotFound(String),
    OldDirNotFound(String),
    DirNewExists(String),
    FileExists(String),
    FileNotFound(String),
    OldFileNotFound(String),
    FileNewExists(String),
    DepthExceeded { path: String, max_depth: usize },
    IoError(io::Error),
}

impl StorageError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::InvalidPath(_) => "invalid_path",
            StorageError::InvalidFile(_) => "invalid_file",
            StorageError::DirExists(_) => "dir_exist",
            StorageError::DirNotFound(_) => "dir_not_found",
            StorageError::OldDirNotFound(_) => "old_dir_not_found",
            StorageError::DirNewExists(_) => "new_dir_exist",
            StorageError::FileExists(_) => "file_exist",
            StorageError::FileNotFound(_) => "file_not_found",
            StorageError::OldFileNotFound(_) => "old_file_not_found",
            StorageError::FileNewExists(_) => "new_file_exist",
            StorageError::DepthExceeded { .. } => "max_depth_exceeded",
            StorageError::IoError(_) => "io_error",
        }
    }

    /// Whether the error is one of the classified domain kinds rather than an
    /// opaque I/O failure.
    pub fn is_domain(&self) -> bool {
        !matches!(self, StorageError::IoError(_))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::InvalidFile(n) => write!(f, "Invalid file: {}", n),
            StorageError::DirExists(p) => write!(f, "Directory already exists: {}", p),
            StorageError::DirNotFound(p) => write!(f, "Directory not found: {}", p),
            StorageError::OldDirNotFound(p) => write!(f, "Source directory not found: {}", p),
            StorageError::DirNewExists(p) => write!(f, "Destination already exists: {}", p),
            StorageError::FileExists(p) => write!(f, "File already exists: {}", p),
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::OldFileNotFound(p) => write!(f, "Source file not found: {}", p),
            StorageError::FileNewExists(p) => write!(f, "Destination file already exists: {}", p),
            StorageError::DepthExceeded { path, max_depth } => {
                write!(f, "Maximum directory depth {} exceeded at: {}", max_depth, path)
            }
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_client_facing_vocabulary() {
        assert_eq!(StorageError::DirExists("x".into()).code(), "dir_exist");
        assert_eq!(StorageError::DirNewExists("x".into()).code(), "new_dir_exist");
        assert_eq!(StorageError::OldFileNotFound("x".into()).code(), "old_file_not_found");
        assert_eq!(
            StorageError::DepthExceeded { path: "a".into(), max_depth: 5 }.code(),
            "max_depth_exceeded"
        );
    }

    #[test]
    fn io_errors_are_not_domain_errors() {
        let err = StorageError::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert!(!err.is_domain());
        assert_eq!(err.code(), "io_error");
        assert!(StorageError::InvalidPath("..".into()).is_domain());
    }
}
