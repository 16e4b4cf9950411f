//! Directory operations
//!
//! Create, delete and rename directories under the sandbox root.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::StorageError;
use crate::sandbox::{
    DepthLimiter, GuardMode, RootAccess, SandboxRoot, resolve, verify_no_escaping_symlink,
};
use crate::storage::probe;

/// Permission bits for every directory created by this module
pub const DIR_MODE: u32 = 0o700;

/// Creates a directory, including any missing parents
pub fn create_dir(root: &SandboxRoot, path: &str) -> Result<(), StorageError> {
    let target = resolve(root, path, RootAccess::Deny)?;
    verify_no_escaping_symlink(root, &target, GuardMode::AncestorsOnly)?;

    match probe(&target)? {
        Some(metadata) if metadata.is_dir() => {
            return Err(StorageError::DirExists(target.requested().to_string()));
        }
        Some(_) => return Err(StorageError::InvalidPath(target.requested().to_string())),
        None => {}
    }

    create_private_dir_all(target.absolute()).map_err(|e| match e.kind() {
        io::ErrorKind::NotADirectory | io::ErrorKind::AlreadyExists => {
            StorageError::InvalidPath(target.requested().to_string())
        }
        _ => StorageError::from(e),
    })
}

/// Deletes a directory and everything below it.
///
/// The whole subtree is checked for escaping symlinks and excessive depth
/// before anything is removed.
pub fn delete_dir(
    root: &SandboxRoot,
    path: &str,
    limiter: &DepthLimiter,
) -> Result<(), StorageError> {
    let target = resolve(root, path, RootAccess::Deny)?;
    verify_no_escaping_symlink(root, &target, GuardMode::FullTree(limiter))?;

    match probe(&target)? {
        None => Err(StorageError::DirNotFound(target.requested().to_string())),
        Some(metadata) if !metadata.is_dir() => {
            Err(StorageError::InvalidPath(target.requested().to_string()))
        }
        Some(_) => {
            fs::remove_dir_all(target.absolute())?;
            Ok(())
        }
    }
}

/// Renames (moves) a directory. The destination must not exist.
pub fn rename_dir(root: &SandboxRoot, old_path: &str, new_path: &str) -> Result<(), StorageError> {
    let old = resolve(root, old_path, RootAccess::Deny)?;
    let new = resolve(root, new_path, RootAccess::Deny)?;
    verify_no_escaping_symlink(root, &old, GuardMode::AncestorsOnly)?;
    verify_no_escaping_symlink(root, &new, GuardMode::AncestorsOnly)?;

    match probe(&old)? {
        None => return Err(StorageError::OldDirNotFound(old.requested().to_string())),
        Some(metadata) if !metadata.is_dir() => {
            return Err(StorageError::InvalidPath(old.requested().to_string()));
        }
        Some(_) => {}
    }
    if probe(&new)?.is_some() {
        return Err(StorageError::DirNewExists(new.requested().to_string()));
    }
    // A directory cannot become its own descendant
    if new.absolute().starts_with(old.absolute()) {
        return Err(StorageError::InvalidPath(new.requested().to_string()));
    }

    fs::rename(old.absolute(), new.absolute())?;
    Ok(())
}

fn create_private_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}
