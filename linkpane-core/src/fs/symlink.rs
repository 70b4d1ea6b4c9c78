//! Platform symlink primitive.
//!
//! Windows stores file links and directory links differently and a link of
//! the wrong type is unusable, so callers pass the directory hint through.
//! Unix ignores it.

use std::io;
use std::path::Path;

/// How a symbolic link presents itself when queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    File,
    Directory,
}

#[cfg(unix)]
pub fn create(original: &Path, link: &Path, _is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
pub fn create(original: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}

#[cfg(not(any(unix, windows)))]
pub fn create(_original: &Path, _link: &Path, _is_dir: bool) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

/// Kind of the symlink at `path`, or `None` if `path` is not a symlink.
#[must_use]
pub fn link_kind(path: &Path) -> Option<LinkKind> {
    let meta = std::fs::symlink_metadata(path).ok()?;
    if !meta.file_type().is_symlink() {
        return None;
    }

    Some(kind_of(path, &meta))
}

#[cfg(windows)]
fn kind_of(_path: &Path, meta: &std::fs::Metadata) -> LinkKind {
    use std::os::windows::fs::FileTypeExt;

    if meta.file_type().is_symlink_dir() {
        LinkKind::Directory
    } else {
        LinkKind::File
    }
}

#[cfg(not(windows))]
fn kind_of(path: &Path, _meta: &std::fs::Metadata) -> LinkKind {
    // Unix links are untyped; report what they resolve to.
    if path.is_dir() {
        LinkKind::Directory
    } else {
        LinkKind::File
    }
}
