//! Two independent panes plus the drop-to-link workflow between them.
//!
//! The presentation layer owns gestures and dialogs; it calls into
//! [`DualPane`] and reacts to the returned values.

use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use tracing::{info, instrument};

use crate::config::Config;
use crate::fs::privilege::has_elevated_privileges;
use crate::model::pane::{NavigateOutcome, PaneNavigator, PaneRoot};
use crate::operators::link_creator::{LinkCreator, LinkRequest, LinkResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneId {
    Left,
    Right,
}

impl PaneId {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];
}

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Asked before a link is created (e.g. a yes/no dialog).
pub trait ConfirmLink {
    fn confirm(&mut self, request: &LinkRequest) -> bool;
}

impl<F> ConfirmLink for F
where
    F: FnMut(&LinkRequest) -> bool,
{
    fn confirm(&mut self, request: &LinkRequest) -> bool {
        self(request)
    }
}

#[derive(Debug)]
pub enum DropOutcome {
    /// The user declined; nothing was touched.
    Cancelled,

    Completed {
        result: LinkResult,

        /// Panes whose displayed subtree contains the target folder.
        /// Empty when creation failed.
        refresh: SmallVec<[PaneId; 2]>,
    },
}

#[derive(Debug)]
pub struct DualPane {
    left: PaneNavigator,
    right: PaneNavigator,
    creator: LinkCreator,
    config: Config,
}

impl DualPane {
    /// Both panes start at the reset location.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_creator(config, LinkCreator::new())
    }

    #[must_use]
    pub fn with_creator(config: Config, creator: LinkCreator) -> Self {
        let start = config.reset_location();
        let case = config.case_sensitivity;
        let pane = || PaneNavigator::starting_at(start.as_deref()).with_case_sensitivity(case);

        Self {
            left: pane(),
            right: pane(),
            creator,
            config,
        }
    }

    #[must_use]
    pub const fn pane(&self, id: PaneId) -> &PaneNavigator {
        match id {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, id: PaneId) -> &mut PaneNavigator {
        match id {
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn navigate(&mut self, id: PaneId, path: &Path) -> NavigateOutcome {
        self.pane_mut(id).navigate_to(path)
    }

    pub fn step_up(&mut self, id: PaneId) -> NavigateOutcome {
        self.pane_mut(id).step_up()
    }

    /// Back to the configured default, or the home directory as it is now.
    pub fn reset(&mut self, id: PaneId) -> NavigateOutcome {
        match self.config.reset_location() {
            Some(location) => self.pane_mut(id).reset(&location),
            None => NavigateOutcome::Unchanged,
        }
    }

    /// A path dropped from outside the application just navigates.
    pub fn handle_external_drop(&mut self, id: PaneId, path: &Path) -> NavigateOutcome {
        self.navigate(id, path)
    }

    /// Folder a drop lands in: the hovered directory, the parent of a hovered
    /// file, or the pane's root when nothing is under the cursor.
    #[must_use]
    pub fn resolve_drop_target(&self, id: PaneId, hovered: Option<&Path>) -> Option<PathBuf> {
        match hovered {
            Some(path) if path.is_dir() => Some(path.to_path_buf()),
            Some(path) => path.parent().map(Path::to_path_buf),
            None => match self.pane(id).current_root() {
                PaneRoot::AllRoots => None,
                PaneRoot::Dir(root) => Some(root.clone()),
            },
        }
    }

    #[must_use]
    pub fn panes_to_refresh(&self, target_folder: &Path) -> SmallVec<[PaneId; 2]> {
        PaneId::ALL
            .into_iter()
            .filter(|id| self.pane(*id).contains(target_folder))
            .collect()
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(source = %source.display(), target = %target_folder.display())
    )]
    pub fn handle_drop(
        &self,
        source: &Path,
        target_folder: &Path,
        confirm: &mut dyn ConfirmLink,
    ) -> DropOutcome {
        let request = LinkRequest::new(source, target_folder);
        info!(
            marker = "DROP_RECEIVED",
            operation_type = "create_link",
            "Handling drop from '{}' to '{}'",
            source.display(),
            target_folder.display()
        );

        if self.config.confirm_before_link && !confirm.confirm(&request) {
            info!(
                marker = "DROP_CANCELLED",
                operation_type = "create_link",
                "User cancelled the operation."
            );
            return DropOutcome::Cancelled;
        }

        let result = self.creator.create_link(&request.source, &request.target_folder);
        let refresh = if result.is_ok() {
            self.panes_to_refresh(&request.target_folder)
        } else {
            SmallVec::new()
        };

        for id in &refresh {
            info!(marker = "PANE_REFRESH", operation_type = "create_link", pane = %id);
        }

        DropOutcome::Completed { result, refresh }
    }

    #[must_use]
    pub fn window_title(&self, base: &str) -> String {
        if has_elevated_privileges() {
            format!("{base} (Administrator)")
        } else {
            base.to_string()
        }
    }
}
