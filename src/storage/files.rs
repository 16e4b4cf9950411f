//! File operations
//!
//! Upload, list, delete and rename files under the sandbox root.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};

use crate::error::StorageError;
use crate::sandbox::{GuardMode, RootAccess, SandboxRoot, resolve, verify_no_escaping_symlink};
use crate::storage::listing;
use crate::storage::probe;
use crate::storage::results::{DirEntryDescriptor, UploadedContent};

const NAME_SEPARATORS: &[char] = &['/', '\\'];

/// Stores uploaded content as a new file inside the directory `path`.
///
/// Only the base name of the declared file name is used. An existing file is
/// never overwritten. Both the source stream and the new file are released on
/// every exit path; a partially written file is removed.
pub fn create_file<R: Read>(
    root: &SandboxRoot,
    path: &str,
    content: UploadedContent<R>,
) -> Result<(), StorageError> {
    let (declared_name, mut source) = content.into_parts();
    let file_name = base_name(&declared_name)
        .ok_or_else(|| StorageError::InvalidFile(declared_name.clone()))?;

    let dir = resolve(root, path, RootAccess::Allow)?;
    verify_no_escaping_symlink(root, &dir, GuardMode::AncestorsOnly)?;
    match probe(&dir)? {
        None => return Err(StorageError::DirNotFound(dir.requested().to_string())),
        Some(metadata) if !metadata.is_dir() => {
            return Err(StorageError::InvalidPath(dir.requested().to_string()));
        }
        Some(_) => {}
    }

    let target = dir.child(file_name);
    if probe(&target)?.is_some() {
        return Err(StorageError::FileExists(target.requested().to_string()));
    }

    let mut destination = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target.absolute())
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => StorageError::FileExists(target.requested().to_string()),
            _ => StorageError::from(e),
        })?;

    let copied = io::copy(&mut source, &mut destination).and_then(|_| destination.flush());
    drop(destination);
    if let Err(e) = copied {
        let _ = fs::remove_file(target.absolute());
        return Err(e.into());
    }
    Ok(())
}

/// Lists the immediate children of the directory `path`.
///
/// An empty path lists the sandbox root.
pub fn get_files(
    root: &SandboxRoot,
    path: &str,
    sniff_bytes: usize,
) -> Result<Vec<DirEntryDescriptor>, StorageError> {
    let dir = resolve(root, path, RootAccess::Allow)?;
    verify_no_escaping_symlink(root, &dir, GuardMode::AncestorsOnly)?;
    match probe(&dir)? {
        None => return Err(StorageError::DirNotFound(dir.requested().to_string())),
        Some(metadata) if !metadata.is_dir() => {
            return Err(StorageError::InvalidPath(dir.requested().to_string()));
        }
        Some(_) => {}
    }

    Ok(listing::read_entries(dir.absolute(), sniff_bytes)?)
}

/// Deletes a single file
pub fn delete_file(root: &SandboxRoot, path: &str) -> Result<(), StorageError> {
    let target = resolve(root, path, RootAccess::Deny)?;
    verify_no_escaping_symlink(root, &target, GuardMode::AncestorsOnly)?;

    match probe(&target)? {
        None => Err(StorageError::FileNotFound(target.requested().to_string())),
        Some(metadata) if metadata.is_dir() => {
            Err(StorageError::InvalidPath(target.requested().to_string()))
        }
        Some(_) => {
            fs::remove_file(target.absolute())?;
            Ok(())
        }
    }
}

/// Renames (moves) a file. The destination must not exist; an existing
/// directory at the destination is reported as `InvalidPath`.
pub fn rename_file(root: &SandboxRoot, old_path: &str, new_path: &str) -> Result<(), StorageError> {
    let old = resolve(root, old_path, RootAccess::Deny)?;
    let new = resolve(root, new_path, RootAccess::Deny)?;
    verify_no_escaping_symlink(root, &old, GuardMode::AncestorsOnly)?;
    verify_no_escaping_symlink(root, &new, GuardMode::AncestorsOnly)?;

    match probe(&old)? {
        None => return Err(StorageError::OldFileNotFound(old.requested().to_string())),
        Some(metadata) if metadata.is_dir() => {
            return Err(StorageError::InvalidPath(old.requested().to_string()));
        }
        Some(_) => {}
    }
    match probe(&new)? {
        Some(metadata) if metadata.is_dir() => {
            return Err(StorageError::InvalidPath(new.requested().to_string()));
        }
        Some(_) => return Err(StorageError::FileNewExists(new.requested().to_string())),
        None => {}
    }

    fs::rename(old.absolute(), new.absolute())?;
    Ok(())
}

/// Last component of a declared upload name, or `None` when nothing usable
/// remains.
fn base_name(declared: &str) -> Option<&str> {
    let name = declared
        .trim_end_matches(NAME_SEPARATORS)
        .rsplit(NAME_SEPARATORS)
        .next()?;
    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return None;
    }
    Some(name)
}
