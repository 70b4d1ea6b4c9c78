//! Lexical path helpers: normalization, base names and subtree containment.
//!
//! Nothing here touches the filesystem, so containment checks stay cheap
//! and never fail on paths that have since disappeared.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How path components are compared for containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    /// Follow the host platform's filesystem convention.
    #[default]
    Auto,
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// Windows and macOS default to case-insensitive filesystems.
    #[inline]
    #[must_use]
    pub const fn platform() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }

    #[inline]
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Auto => Self::platform(),
            other => other,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_insensitive(self) -> bool {
        matches!(self.resolve(), Self::Insensitive)
    }
}

/// Resolve `.` and `..` without consulting the filesystem.
///
/// `..` never climbs above a root or prefix; on a relative path with nothing
/// left to pop it is kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}

/// Final path component as a display string.
#[must_use]
pub fn base_name(path: &Path) -> Option<String> {
    normalize(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn fold(component: Component<'_>, case: CaseSensitivity) -> OsString {
    if case.is_insensitive() {
        OsString::from(component.as_os_str().to_string_lossy().to_lowercase())
    } else {
        component.as_os_str().to_os_string()
    }
}

/// True iff `candidate` is `root` or nested beneath it after normalization.
///
/// Paths on different drives or volumes share no prefix and compare false.
#[must_use]
pub fn is_within(candidate: &Path, root: &Path, case: CaseSensitivity) -> bool {
    let root = normalize(root);
    if root.as_os_str().is_empty() {
        return false;
    }

    let candidate = normalize(candidate);
    let mut root_parts = root.components();
    let mut candidate_parts = candidate.components();

    loop {
        match (root_parts.next(), candidate_parts.next()) {
            (None, _) => return true,
            (Some(_), None) => return false,
            (Some(r), Some(c)) => {
                if fold(r, case) != fold(c, case) {
                    return false;
                }
            }
        }
    }
}
