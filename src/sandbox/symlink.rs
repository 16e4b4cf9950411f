//! Symlink guard
//!
//! Looks for symbolic links that could redirect a lexically valid path out
//! of the sandbox. Every check is redone on each call; nothing is cached.
//!
//! Detection is fail-closed: any stat or resolve error on an inspected entry
//! rejects the operation with `InvalidPath`. The only tolerated error is a
//! missing ancestor, which cannot redirect anything.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::StorageError;
use crate::sandbox::depth::DepthLimiter;
use crate::sandbox::resolve::ResolvedPath;
use crate::sandbox::root::SandboxRoot;

#[derive(Debug, Clone, Copy)]
pub enum GuardMode<'a> {
    /// Reject if any directory strictly between the root and the target is a
    /// symlink.
    AncestorsOnly,
    /// Ancestor check, then every entry of the subtree under the target: each
    /// symlink must resolve to a location inside the root, and every entry
    /// must stay within the depth limit.
    FullTree(&'a DepthLimiter),
}

/// Verify that no symlink can carry an operation on `target` outside `root`.
pub fn verify_no_escaping_symlink(
    root: &SandboxRoot,
    target: &ResolvedPath,
    mode: GuardMode<'_>,
) -> Result<(), StorageError> {
    let reject = || StorageError::InvalidPath(target.requested().to_string());

    let ancestors = target
        .absolute()
        .ancestors()
        .skip(1)
        .take_while(|ancestor| *ancestor != root.path() && ancestor.starts_with(root.path()));
    for ancestor in ancestors {
        match fs::symlink_metadata(ancestor) {
            Ok(metadata) if metadata.file_type().is_symlink() => return Err(reject()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(_) => return Err(reject()),
        }
    }

    let GuardMode::FullTree(limiter) = mode else {
        return Ok(());
    };

    // The walk must never start by following a link at the target itself.
    match fs::symlink_metadata(target.absolute()) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            return check_link_target(root, target.absolute()).map_err(|_| reject());
        }
        Ok(metadata) if !metadata.is_dir() => return Ok(()),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(_) => return Err(reject()),
    }

    let walker = WalkDir::new(target.absolute())
        .follow_links(false)
        .follow_root_links(false);
    for entry in walker {
        let entry = entry.map_err(|_| reject())?;
        let relative = entry
            .path()
            .strip_prefix(target.absolute())
            .map_err(|_| reject())?;
        limiter.check(relative, target.requested())?;

        if entry.path_is_symlink() {
            check_link_target(root, entry.path()).map_err(|_| reject())?;
        }
    }

    Ok(())
}

/// Resolve the link at `path` to its final target and require it to lie
/// inside `root`.
fn check_link_target(root: &SandboxRoot, path: &Path) -> io::Result<()> {
    let resolved = fs::canonicalize(path)?;
    if root.contains(&resolved) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "symlink points outside the sandbox root",
        ))
    }
}
