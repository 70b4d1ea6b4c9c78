//! src/model/pane.rs
//! ============================================================================
//! # `PaneNavigator`: the displayed root of one browsing pane
//!
//! Each pane owns its navigator exclusively. Navigation that cannot happen
//! (missing path, stepping up from a volume root) is a normal user action
//! and reports [`NavigateOutcome::Unchanged`] rather than an error.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::fs::paths::{self, CaseSensitivity};

/// What a pane currently shows at its top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneRoot {
    /// Every top-level filesystem root / drive, nothing expanded.
    AllRoots,
    Dir(PathBuf),
}

impl PaneRoot {
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::AllRoots => None,
            Self::Dir(path) => Some(path),
        }
    }

    /// Roots listed while in the [`PaneRoot::AllRoots`] state.
    #[must_use]
    pub fn volumes() -> Vec<PathBuf> {
        if cfg!(windows) {
            (b'A'..=b'Z')
                .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
                .filter(|drive| drive.exists())
                .collect()
        } else {
            vec![PathBuf::from("/")]
        }
    }
}

impl std::fmt::Display for PaneRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllRoots => Ok(()),
            Self::Dir(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// Root changed; `highlight` is the item the view should select and
    /// scroll to (the requested path itself).
    Moved { root: PathBuf, highlight: PathBuf },
    AllRoots,
    Unchanged,
}

impl NavigateOutcome {
    #[inline]
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[derive(Debug, Clone)]
pub struct PaneNavigator {
    root: PaneRoot,
    case: CaseSensitivity,
}

impl PaneNavigator {
    #[must_use]
    pub fn new(root: PaneRoot) -> Self {
        Self {
            root,
            case: CaseSensitivity::Auto,
        }
    }

    /// Start at `default` if it can be navigated to, otherwise at all roots.
    #[must_use]
    pub fn starting_at(default: Option<&Path>) -> Self {
        let mut pane = Self::new(PaneRoot::AllRoots);
        if let Some(path) = default {
            pane.reset(path);
        }
        pane
    }

    #[must_use]
    pub const fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }

    #[inline]
    #[must_use]
    pub const fn current_root(&self) -> &PaneRoot {
        &self.root
    }

    /// String form: empty for the all-roots state.
    #[must_use]
    pub fn current_root_display(&self) -> String {
        self.root.to_string()
    }

    #[instrument(level = "debug", skip(self, path), fields(path = %path.display()))]
    pub fn navigate_to(&mut self, path: &Path) -> NavigateOutcome {
        if path.as_os_str().is_empty() {
            self.root = PaneRoot::AllRoots;
            debug!(marker = "NAVIGATE_ALL_ROOTS", operation_type = "navigate");
            return NavigateOutcome::AllRoots;
        }

        if !path.exists() {
            debug!(marker = "NAVIGATE_SKIPPED", operation_type = "navigate", "Path does not exist");
            return NavigateOutcome::Unchanged;
        }

        let target_dir = if path.is_dir() {
            path
        } else {
            match path.parent() {
                Some(parent) => parent,
                None => return NavigateOutcome::Unchanged,
            }
        };

        if !target_dir.is_dir() {
            return NavigateOutcome::Unchanged;
        }

        // Stored clean so `step_up` always lands on the shown directory's parent.
        let root = paths::normalize(target_dir);
        self.root = PaneRoot::Dir(root.clone());
        debug!(
            marker = "NAVIGATE_COMPLETE",
            operation_type = "navigate",
            root = %root.display()
        );

        NavigateOutcome::Moved {
            root,
            highlight: path.to_path_buf(),
        }
    }

    pub fn step_up(&mut self) -> NavigateOutcome {
        let Some(root) = self.root.as_path() else {
            return NavigateOutcome::Unchanged;
        };

        match root.parent() {
            Some(parent) if parent.exists() => {
                let parent = parent.to_path_buf();
                self.navigate_to(&parent)
            }
            _ => NavigateOutcome::Unchanged,
        }
    }

    /// Same as [`navigate_to`](Self::navigate_to); callers resolve the
    /// default (usually the home directory) at call time.
    pub fn reset(&mut self, default: &Path) -> NavigateOutcome {
        self.navigate_to(default)
    }

    /// Whether `candidate` is this pane's root or lies beneath it.
    /// Always false while showing all roots.
    #[must_use]
    pub fn contains(&self, candidate: &Path) -> bool {
        match &self.root {
            PaneRoot::AllRoots => false,
            PaneRoot::Dir(root) => paths::is_within(candidate, root, self.case),
        }
    }
}

impl Default for PaneNavigator {
    fn default() -> Self {
        Self::new(PaneRoot::AllRoots)
    }
}
