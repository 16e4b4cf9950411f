mod common;

use std::fs;
use std::io::{self, Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{sandbox, write_file};
use rax_files_service::StorageError;
use rax_files_service::storage::{
    DirEntryDescriptor, UploadedContent, create_dir, create_file, delete_file, get_files,
    rename_file,
};

fn upload(name: &str, bytes: &[u8]) -> UploadedContent<Cursor<Vec<u8>>> {
    UploadedContent::new(name, Cursor::new(bytes.to_vec()))
}

/// Reader that yields some bytes, then fails, and records being dropped.
struct FailingReader {
    sent: bool,
    dropped: Arc<AtomicBool>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.sent {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"));
        }
        self.sent = true;
        buf[..4].copy_from_slice(b"part");
        Ok(4)
    }
}

impl Drop for FailingReader {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[test]
fn create_file_stores_content_in_existing_dir() {
    let (_dir, root) = sandbox();
    create_dir(&root, "uploads/images").expect("mkdir");

    create_file(&root, "uploads/images", upload("pic.png", b"bytes")).expect("create");
    assert_eq!(
        fs::read(root.path().join("uploads/images/pic.png")).expect("read"),
        b"bytes"
    );
}

#[test]
fn create_file_accepts_the_root_directory() {
    let (_dir, root) = sandbox();
    create_file(&root, "", upload("top.txt", b"a")).expect("empty path");
    create_file(&root, ".", upload("dot.txt", b"b")).expect("dot path");
    assert!(root.path().join("top.txt").is_file());
    assert!(root.path().join("dot.txt").is_file());
}

#[test]
fn create_file_keeps_only_the_base_name() {
    let (_dir, root) = sandbox();
    create_dir(&root, "inbox").expect("mkdir");

    create_file(&root, "inbox", upload("../../etc/passwd", b"x")).expect("create");
    assert!(root.path().join("inbox/passwd").is_file());
    assert!(!root.path().join("etc").exists());
}

#[test]
fn create_file_requires_a_declared_name() {
    let (_dir, root) = sandbox();
    for name in ["", "..", "/", "dir/.."] {
        let err = create_file(&root, "", upload(name, b"x")).expect_err("bad name");
        assert!(matches!(err, StorageError::InvalidFile(_)), "{name:?} -> {err:?}");
    }
    assert!(fs::read_dir(root.path()).expect("read_dir").next().is_none());
}

#[test]
fn create_file_in_missing_dir_reports_dir_not_found() {
    let (_dir, root) = sandbox();
    let err = create_file(&root, "nowhere", upload("a.txt", b"x")).expect_err("missing dir");
    assert!(matches!(err, StorageError::DirNotFound(ref p) if p == "nowhere"), "{err:?}");
}

#[test]
fn create_file_into_a_file_path_is_invalid() {
    let (_dir, root) = sandbox();
    write_file(&root, "plain.txt", b"x");
    let err = create_file(&root, "plain.txt", upload("a.txt", b"y")).expect_err("not a dir");
    assert!(matches!(err, StorageError::InvalidPath(_)), "{err:?}");
}

#[test]
fn create_file_never_overwrites() {
    let (_dir, root) = sandbox();
    write_file(&root, "docs/report.txt", b"original");

    let err = create_file(&root, "docs", upload("report.txt", b"replacement")).expect_err("exists");
    assert!(
        matches!(err, StorageError::FileExists(ref p) if p == "docs/report.txt"),
        "{err:?}"
    );
    assert_eq!(fs::read(root.path().join("docs/report.txt")).expect("read"), b"original");
}

#[test]
fn create_file_rejects_traversal_in_directory() {
    let (_dir, root) = sandbox();
    for path in ["../../etc", "uploads/../..", "/etc"] {
        let err = create_file(&root, path, upload("hack.txt", b"x")).expect_err("escape");
        assert!(matches!(err, StorageError::InvalidPath(_)), "{path:?} -> {err:?}");
    }
}

#[test]
fn failed_copy_releases_stream_and_removes_partial_file() {
    let (_dir, root) = sandbox();
    let dropped = Arc::new(AtomicBool::new(false));
    let reader = FailingReader {
        sent: false,
        dropped: Arc::clone(&dropped),
    };

    let err = create_file(&root, "", UploadedContent::new("partial.bin", reader)).expect_err("copy fails");
    assert!(matches!(err, StorageError::IoError(_)), "{err:?}");
    assert!(dropped.load(Ordering::SeqCst), "source stream must be released");
    assert!(!root.path().join("partial.bin").exists());
}

#[test]
fn listing_orders_directories_first_then_names() {
    let (_dir, root) = sandbox();
    write_file(&root, "b.txt", b"bbb");
    create_dir(&root, "a").expect("mkdir");
    write_file(&root, "c.txt", b"c");

    let entries = get_files(&root, "", 512).expect("list");
    assert_eq!(
        entries,
        vec![
            DirEntryDescriptor::directory("a"),
            DirEntryDescriptor::file("b.txt", 3, Some("text/plain; charset=utf-8".into())),
            DirEntryDescriptor::file("c.txt", 1, Some("text/plain; charset=utf-8".into())),
        ]
    );
}

#[test]
fn listing_is_not_recursive() {
    let (_dir, root) = sandbox();
    write_file(&root, "outer/inner/deep.txt", b"x");
    let entries = get_files(&root, "outer", 512).expect("list");
    assert_eq!(entries, vec![DirEntryDescriptor::directory("inner")]);
}

#[test]
fn listing_sniffs_content_types() {
    let (_dir, root) = sandbox();
    write_file(&root, "doc.pdf", b"%PDF-1.7\n%binary");
    write_file(&root, "blob", &[0u8, 1, 2, 3, 4, 5]);

    let entries = get_files(&root, "", 512).expect("list");
    let mime = |name: &str| {
        entries
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.mime_type.clone())
    };
    assert_eq!(mime("doc.pdf").as_deref(), Some("application/pdf"));
    assert_eq!(mime("blob").as_deref(), Some("application/octet-stream"));
}

#[test]
fn empty_directory_lists_nothing() {
    let (_dir, root) = sandbox();
    create_dir(&root, "empty").expect("mkdir");
    assert!(get_files(&root, "empty", 512).expect("list").is_empty());
    assert!(get_files(&root, "", 512).expect("list root").len() == 1);
}

#[test]
fn listing_missing_or_non_directory_targets() {
    let (_dir, root) = sandbox();
    write_file(&root, "file.txt", b"x");

    let err = get_files(&root, "ghost", 512).expect_err("missing");
    assert!(matches!(err, StorageError::DirNotFound(_)), "{err:?}");
    let err = get_files(&root, "file.txt", 512).expect_err("file");
    assert!(matches!(err, StorageError::InvalidPath(_)), "{err:?}");
    let err = get_files(&root, "..", 512).expect_err("escape");
    assert!(matches!(err, StorageError::InvalidPath(_)), "{err:?}");
}

#[test]
fn delete_file_removes_only_the_file() {
    let (_dir, root) = sandbox();
    write_file(&root, "uploads/images/pic.png", b"x");
    delete_file(&root, "uploads/images/pic.png").expect("delete");
    assert!(!root.path().join("uploads/images/pic.png").exists());
    assert!(root.path().join("uploads/images").is_dir());
}

#[test]
fn delete_file_errors() {
    let (_dir, root) = sandbox();
    create_dir(&root, "dir").expect("mkdir");

    let err = delete_file(&root, "missing.txt").expect_err("missing");
    assert!(matches!(err, StorageError::FileNotFound(ref p) if p == "missing.txt"), "{err:?}");
    let err = delete_file(&root, "dir").expect_err("directory");
    assert!(matches!(err, StorageError::InvalidPath(_)), "{err:?}");
    assert!(root.path().join("dir").is_dir());
    for path in ["", "..", "../secret.txt", "uploads/../../secret.txt", "/etc/passwd"] {
        let err = delete_file(&root, path).expect_err("invalid");
        assert!(matches!(err, StorageError::InvalidPath(_)), "{path:?} -> {err:?}");
    }
}

#[test]
fn rename_file_moves_bytes() {
    let (_dir, root) = sandbox();
    write_file(&root, "a.txt", b"original bytes");

    rename_file(&root, "a.txt", "b.txt").expect("rename");
    assert!(!root.path().join("a.txt").exists());
    assert_eq!(fs::read(root.path().join("b.txt")).expect("read"), b"original bytes");
}

#[test]
fn rename_file_onto_existing_file_modifies_nothing() {
    let (_dir, root) = sandbox();
    write_file(&root, "a.txt", b"aaa");
    write_file(&root, "b.txt", b"bbb");

    let err = rename_file(&root, "a.txt", "b.txt").expect_err("exists");
    assert!(matches!(err, StorageError::FileNewExists(ref p) if p == "b.txt"), "{err:?}");
    assert_eq!(fs::read(root.path().join("a.txt")).expect("read a"), b"aaa");
    assert_eq!(fs::read(root.path().join("b.txt")).expect("read b"), b"bbb");
}

#[test]
fn rename_file_onto_directory_is_invalid_path() {
    let (_dir, root) = sandbox();
    write_file(&root, "a.txt", b"aaa");
    create_dir(&root, "folder").expect("mkdir");

    let err = rename_file(&root, "a.txt", "folder").expect_err("directory");
    assert!(matches!(err, StorageError::InvalidPath(ref p) if p == "folder"), "{err:?}");
}

#[test]
fn rename_file_errors_on_missing_or_directory_source() {
    let (_dir, root) = sandbox();
    create_dir(&root, "folder").expect("mkdir");

    let err = rename_file(&root, "ghost.txt", "b.txt").expect_err("missing");
    assert!(matches!(err, StorageError::OldFileNotFound(_)), "{err:?}");
    let err = rename_file(&root, "folder", "b.txt").expect_err("directory");
    assert!(matches!(err, StorageError::InvalidPath(_)), "{err:?}");
    let err = rename_file(&root, "folder", "../b.txt").expect_err("escape");
    assert!(matches!(err, StorageError::InvalidPath(_)), "{err:?}");
}

#[cfg(unix)]
#[test]
fn listing_does_not_open_special_files() {
    use std::process::Command;
    use std::sync::mpsc;
    use std::time::Duration;

    let (_dir, root) = sandbox();
    write_file(&root, "note.txt", b"hello");
    let status = Command::new("mkfifo")
        .arg(root.path().join("pipe"))
        .status()
        .expect("run mkfifo");
    assert!(status.success());

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(get_files(&root, "", 512));
    });
    let entries = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("listing must not block on a FIFO")
        .expect("list");

    let pipe = entries.iter().find(|e| e.name == "pipe").expect("pipe listed");
    assert!(!pipe.is_directory);
    assert_eq!(pipe.mime_type, None);
    let note = entries.iter().find(|e| e.name == "note.txt").expect("note listed");
    assert_eq!(note.mime_type.as_deref(), Some("text/plain; charset=utf-8"));
}
