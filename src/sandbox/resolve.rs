//! Path resolution
//!
//! Turns an untrusted client path into an absolute location under the
//! sandbox root. Two independent containment checks are applied: a syntactic
//! one on the lexically cleaned input, and a relative-path check on the
//! joined result.
//!
//! Resolution never touches the filesystem. Symlinks are the concern of
//! [`crate::sandbox::symlink`].

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;
use crate::sandbox::root::SandboxRoot;

/// Whether a request may name the sandbox root itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootAccess {
    /// Mutations: the root can never be created, deleted or renamed.
    Deny,
    /// Listing and upload targets: an empty path or `.` means the root.
    Allow,
}

/// A validated location inside the sandbox.
///
/// Neither `Clone` nor cached anywhere: every operation
/// resolves again from the raw request string.
#[derive(Debug)]
pub struct ResolvedPath {
    requested: String,
    relative: PathBuf,
    absolute: PathBuf,
}

impl ResolvedPath {
    /// The path exactly as the client sent it.
    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// Location relative to the sandbox root; empty for the root itself.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// A child of this location, used for the leaf of an upload. `name`
    /// must be a single normal component.
    pub fn child(&self, name: &str) -> ResolvedPath {
        let requested = if self.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", self.requested.trim_end_matches('/'), name)
        };
        ResolvedPath {
            requested,
            relative: self.relative.join(name),
            absolute: self.absolute.join(name),
        }
    }
}

/// Resolve `raw` against `root`.
pub fn resolve(
    root: &SandboxRoot,
    raw: &str,
    access: RootAccess,
) -> Result<ResolvedPath, StorageError> {
    let invalid = || StorageError::InvalidPath(raw.to_string());

    if raw.is_empty() && access == RootAccess::Deny {
        return Err(invalid());
    }
    if raw.contains('\0') {
        return Err(invalid());
    }

    // Pre-join syntactic rejection
    let cleaned = clean(raw).ok_or_else(invalid)?;
    if matches!(cleaned.components().next(), Some(Component::ParentDir)) {
        return Err(invalid());
    }
    if cleaned.as_os_str().is_empty() && access == RootAccess::Deny {
        return Err(invalid());
    }

    // Post-join verification, authoritative
    let absolute = normalize_absolute(&root.path().join(&cleaned));
    let relative = root.relative_to(&absolute).ok_or_else(invalid)?;
    if relative.as_os_str().is_empty() && access == RootAccess::Deny {
        return Err(invalid());
    }

    Ok(ResolvedPath {
        requested: raw.to_string(),
        relative,
        absolute,
    })
}

/// Lexically clean a relative path: drop `.` segments, repeated and trailing
/// separators, and fold `..` into the preceding normal segment. Leading `..`
/// segments that cannot be folded are kept. Returns `None` for rooted input.
///
/// The cleaned form of `""`, `"."` and `"a/.."` is the empty path.
pub fn clean(raw: &str) -> Option<PathBuf> {
    let mut segments: Vec<OsString> = Vec::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::CurDir => {}
            Component::ParentDir => match segments.last() {
                Some(last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(OsString::from("..")),
            },
            Component::Normal(part) => segments.push(part.to_os_string()),
        }
    }
    Some(segments.iter().collect())
}

/// Normalize an absolute path without consulting the filesystem. `..` at
/// the filesystem root stays at the root.
fn normalize_absolute(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
