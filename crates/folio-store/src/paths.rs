//! Suffix-tolerant path resolution.
//!
//! [`resolve`] looks a path up literally and then with the storage suffix
//! appended, and reports what kind of entry it found. The store uses it to
//! decide existence and shape; the record bytes always live in
//! `<resource>.<ext>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of entry a path resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (a record).
    File,
    /// A directory (a collection, or a nested directory inside one).
    Directory,
    /// Anything else: sockets, FIFOs, devices.
    Other,
}

/// A path that exists on disk, after suffix resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// The path that was found: either the input or the input plus suffix.
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Resolved {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Append `.{extension}` to `path` without touching any existing dots.
pub fn with_suffix(path: &Path, extension: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(extension);
    PathBuf::from(os)
}

/// Resolve `path` literally, then with `.{extension}` appended.
///
/// Returns `Ok(None)` when neither exists. Errors other than not-found are
/// returned as-is so callers can tell "missing" from "unreadable".
pub fn resolve(path: &Path, extension: &str) -> io::Result<Option<Resolved>> {
    if let Some(found) = stat(path)? {
        return Ok(Some(found));
    }
    stat(&with_suffix(path, extension))
}

/// Look `path` up exactly as given, without trying the suffix.
pub fn stat(path: &Path) -> io::Result<Option<Resolved>> {
    match fs::metadata(path) {
        Ok(meta) => {
            let kind = if meta.is_dir() {
                EntryKind::Directory
            } else if meta.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            Ok(Some(Resolved {
                path: path.to_path_buf(),
                kind,
            }))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
