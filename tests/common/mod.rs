#![allow(dead_code)]

use std::fs;
use std::path::Path;

use rax_files_service::sandbox::SandboxRoot;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A fresh sandbox root in its own temporary directory.
pub fn sandbox() -> (TempDir, SandboxRoot) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = SandboxRoot::new(dir.path()).expect("sandbox root");
    (dir, root)
}

pub fn write_file(root: &SandboxRoot, relative: &str, content: &[u8]) {
    let path = root.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parents");
    }
    fs::write(path, content).expect("write file");
}

/// Every path under `dir`, relative and sorted, to compare trees before and
/// after a rejected operation.
pub fn snapshot(dir: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("walk entry");
            entry
                .path()
                .strip_prefix(dir)
                .expect("under dir")
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    paths.sort();
    paths
}
