//! Sandbox root
//!
//! The single directory every storage operation is confined to.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Canonical, absolute base directory fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SandboxRoot {
    path: PathBuf,
}

impl SandboxRoot {
    /// Resolve `path` (absolute or relative to the working directory) to its
    /// canonical form. The directory must already exist.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().canonicalize()?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("sandbox root is not a directory: {}", path.display()),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Relative form of `candidate` with respect to the root, or `None` when
    /// `candidate` lies outside of it.
    ///
    /// `candidate` must already be absolute and free of `.`/`..` segments;
    /// an empty result means the root itself.
    pub fn relative_to(&self, candidate: &Path) -> Option<PathBuf> {
        let relative = candidate.strip_prefix(&self.path).ok()?;
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return None;
        }
        Some(relative.to_path_buf())
    }

    pub fn contains(&self, candidate: &Path) -> bool {
        self.relative_to(candidate).is_some()
    }
}
