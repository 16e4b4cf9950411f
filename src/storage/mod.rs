//! Sandboxed storage operations
//!
//! Directory and file management confined to the sandbox root. Every
//! operation resolves its input with [`crate::sandbox`], checks for escaping
//! symlinks, and only then touches the filesystem. Nothing here logs; results
//! and errors are returned as values.

pub mod directories;
pub mod files;
pub mod listing;
pub mod mime;
pub mod results;

use std::fs;
use std::io;

use crate::error::StorageError;
use crate::sandbox::ResolvedPath;

pub use directories::{create_dir, delete_dir, rename_dir};
pub use files::{create_file, delete_file, get_files, rename_file};
pub use results::{DirEntryDescriptor, StoragePolicy, UploadedContent};

/// Metadata of `target` without following a final symlink, or `None` when
/// nothing exists there. A non-directory ancestor makes the path invalid.
fn probe(target: &ResolvedPath) -> Result<Option<fs::Metadata>, StorageError> {
    match fs::symlink_metadata(target.absolute()) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => {
            Err(StorageError::InvalidPath(target.requested().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
