//! Directory listing
//!
//! Enumerates the immediate children of a directory into
//! [`DirEntryDescriptor`]s, directories first, each group ordered by name.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

use crate::storage::mime;
use crate::storage::results::DirEntryDescriptor;

/// Describe every immediate child of `dir`, sorted.
///
/// Children that vanish between enumeration and stat are skipped. Only
/// regular files are opened for sniffing; symlinks and special files are
/// reported with their own size and no MIME type.
pub fn read_entries(dir: &Path, sniff_bytes: usize) -> io::Result<Vec<DirEntryDescriptor>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        match describe(&entry, sniff_bytes) {
            Ok(descriptor) => entries.push(descriptor),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }
    sort_entries(&mut entries);
    Ok(entries)
}

fn describe(entry: &fs::DirEntry, sniff_bytes: usize) -> io::Result<DirEntryDescriptor> {
    let name = entry.file_name().to_string_lossy().into_owned();
    let metadata = entry.metadata()?;
    if metadata.is_dir() {
        return Ok(DirEntryDescriptor::directory(name));
    }

    // Opening a FIFO blocks until a writer shows up
    let mime_type = if metadata.file_type().is_file() {
        mime::sniff_file(&entry.path(), sniff_bytes)
    } else {
        None
    };
    Ok(DirEntryDescriptor::file(name, metadata.len(), mime_type))
}

/// Directories before files, then lexicographic by name.
pub fn sort_entries(entries: &mut [DirEntryDescriptor]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &DirEntryDescriptor, b: &DirEntryDescriptor) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.cmp(&b.name))
}
