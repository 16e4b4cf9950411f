//! Sandboxed path handling
//!
//! Resolves client paths against the sandbox root, guards against symlink
//! escapes and bounds recursive traversal depth. Every storage operation goes
//! through this module before touching the filesystem.

pub mod depth;
pub mod resolve;
pub mod root;
pub mod symlink;

pub use depth::{DEFAULT_MAX_DEPTH, DepthLimiter};
pub use resolve::{ResolvedPath, RootAccess, resolve};
pub use root::SandboxRoot;
pub use symlink::{GuardMode, verify_no_escaping_symlink};
