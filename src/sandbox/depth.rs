//! Depth limiting for recursive traversal
//!
//! Bounds how deep a recursive delete may reach below its target. This is a
//! cost and blast-radius policy, not a containment boundary.

use std::path::Path;

use crate::error::StorageError;

pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimiter {
    max_depth: usize,
}

impl Default for DepthLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl DepthLimiter {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Number of separators in `relative`, the path of a visited entry
    /// relative to the traversal target. The target itself and its direct
    /// children are at depth 0.
    pub fn depth_of(relative: &Path) -> usize {
        relative.components().count().saturating_sub(1)
    }

    /// Fail with `DepthExceeded` when `relative` lies too deep. `requested`
    /// is the client path of the traversal target, used in the error.
    pub fn check(&self, relative: &Path, requested: &str) -> Result<(), StorageError> {
        if Self::depth_of(relative) > self.max_depth {
            return Err(StorageError::DepthExceeded {
                path: format!("{}/{}", requested.trim_end_matches('/'), relative.display()),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}
