//! Error handlers
//!
//! Maps storage errors onto console reply codes.

use crate::error::types::StorageError;
use log::{error, warn};

/// Log a storage error at a severity matching its kind
pub fn handle_error(command: &str, err: &StorageError) {
    if err.is_domain() {
        warn!("{} rejected: {}", command, err);
    } else {
        error!("{} failed: {}", command, err);
    }
}

/// Convert error to a console reply code
pub fn error_to_reply_code(err: &StorageError) -> u16 {
    match err {
        StorageError::InvalidFile(_) => 553,
        StorageError::DepthExceeded { .. } => 552,
        StorageError::IoError(_) => 451,
        StorageError::InvalidPath(_)
        | StorageError::DirExists(_)
        | StorageError::DirNotFound(_)
        | StorageError::OldDirNotFound(_)
        | StorageError::DirNewExists(_)
        | StorageError::FileExists(_)
        | StorageError::FileNotFound(_)
        | StorageError::OldFileNotFound(_)
        | StorageError::FileNewExists(_) => 550,
    }
}

/// Format the reply line sent back for a failed command
pub fn error_reply(err: &StorageError) -> String {
    format!("{} {}: {}\r\n", error_to_reply_code(err), err.code(), err)
}
