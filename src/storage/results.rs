//! Storage result types
//!
//! Defines the values passed into and returned by storage operations.

use std::io::Read;

use crate::sandbox::{DEFAULT_MAX_DEPTH, DepthLimiter};
use crate::storage::mime::DEFAULT_SNIFF_BYTES;

/// Tunable limits applied by storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoragePolicy {
    /// Deepest nesting below a directory that a recursive delete accepts
    pub max_delete_depth: usize,
    /// Leading bytes read from each file when sniffing its content type
    pub mime_sniff_bytes: usize,
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self {
            max_delete_depth: DEFAULT_MAX_DEPTH,
            mime_sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }
}

impl StoragePolicy {
    pub fn depth_limiter(&self) -> DepthLimiter {
        DepthLimiter::new(self.max_delete_depth)
    }
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryDescriptor {
    pub name: String,
    pub is_directory: bool,
    /// Present iff the entry is not a directory
    pub size: Option<u64>,
    /// Present iff the entry is not a directory and its content was sniffable
    pub mime_type: Option<String>,
}

impl DirEntryDescriptor {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            size: None,
            mime_type: None,
        }
    }

    pub fn file(name: impl Into<String>, size: u64, mime_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            size: Some(size),
            mime_type,
        }
    }
}

/// Uploaded file content: a declared file name plus the byte stream to store.
///
/// The stream is moved into the create operation and dropped when it returns,
/// whatever the outcome.
pub struct UploadedContent<R> {
    file_name: String,
    reader: R,
}

impl<R: Read> UploadedContent<R> {
    pub fn new(file_name: impl Into<String>, reader: R) -> Self {
        Self {
            file_name: file_name.into(),
            reader,
        }
    }

    pub fn into_parts(self) -> (String, R) {
        (self.file_name, self.reader)
    }
}
