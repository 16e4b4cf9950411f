//! Async file service
//!
//! Exposes the sandboxed storage operations to async callers. The storage
//! core is blocking, so each call runs on tokio's blocking pool.

use std::io::{self, Read};
use std::sync::Arc;

use tokio::task;

use crate::error::StorageError;
use crate::sandbox::SandboxRoot;
use crate::storage::{self, DirEntryDescriptor, StoragePolicy, UploadedContent};

/// Cheaply cloneable handle shared by every session
#[derive(Debug, Clone)]
pub struct FileService {
    root: Arc<SandboxRoot>,
    policy: StoragePolicy,
}

impl FileService {
    pub fn new(root: SandboxRoot, policy: StoragePolicy) -> Self {
        Self {
            root: Arc::new(root),
            policy,
        }
    }

    pub fn root(&self) -> &SandboxRoot {
        &self.root
    }

    pub fn policy(&self) -> StoragePolicy {
        self.policy
    }

    pub async fn create_dir(&self, path: String) -> Result<(), StorageError> {
        let root = Arc::clone(&self.root);
        run_blocking(move || storage::create_dir(&root, &path)).await
    }

    pub async fn delete_dir(&self, path: String) -> Result<(), StorageError> {
        let root = Arc::clone(&self.root);
        let limiter = self.policy.depth_limiter();
        run_blocking(move || storage::delete_dir(&root, &path, &limiter)).await
    }

    pub async fn rename_dir(&self, old_path: String, new_path: String) -> Result<(), StorageError> {
        let root = Arc::clone(&self.root);
        run_blocking(move || storage::rename_dir(&root, &old_path, &new_path)).await
    }

    pub async fn create_file<R>(
        &self,
        path: String,
        content: UploadedContent<R>,
    ) -> Result<(), StorageError>
    where
        R: Read + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        run_blocking(move || storage::create_file(&root, &path, content)).await
    }

    pub async fn get_files(&self, path: String) -> Result<Vec<DirEntryDescriptor>, StorageError> {
        let root = Arc::clone(&self.root);
        let sniff_bytes = self.policy.mime_sniff_bytes;
        run_blocking(move || storage::get_files(&root, &path, sniff_bytes)).await
    }

    pub async fn delete_file(&self, path: String) -> Result<(), StorageError> {
        let root = Arc::clone(&self.root);
        run_blocking(move || storage::delete_file(&root, &path)).await
    }

    pub async fn rename_file(&self, old_path: String, new_path: String) -> Result<(), StorageError> {
        let root = Arc::clone(&self.root);
        run_blocking(move || storage::rename_file(&root, &old_path, &new_path)).await
    }
}

async fn run_blocking<T, F>(operation: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    match task::spawn_blocking(operation).await {
        Ok(result) => result,
        Err(e) => Err(StorageError::IoError(io::Error::other(e))),
    }
}
