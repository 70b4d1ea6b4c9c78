//! # linkpane-core
//!
//! Symbolic link creation and the dual-pane navigation model around it.
//!
//! A presentation layer captures the drag gesture and hands the core a
//! `(source, target folder)` pair. The core validates it, creates the link,
//! classifies any failure and tells the caller which panes need a refresh.

pub mod error;
pub use error::{AppError, LinkError, LinkErrorKind};

pub mod config;
pub use config::Config;

pub mod logging;
pub use logging::LoggerBuilder;

pub mod fs {
    pub mod paths;
    pub use paths::CaseSensitivity;

    pub mod privilege;
    pub use privilege::has_elevated_privileges;

    pub mod symlink;
    pub use symlink::LinkKind;
}

pub mod model {
    pub mod events;
    pub use events::{EventHook, LinkEvent, LinkStage};

    pub mod pane;
    pub use pane::{NavigateOutcome, PaneNavigator, PaneRoot};
}

pub mod operators {
    pub mod link_creator;
    pub use link_creator::{CreatedLink, LinkCreator, LinkRequest, LinkResult, create_link};
}

pub mod controller {
    pub mod dual_pane;
    pub use dual_pane::{ConfirmLink, DropOutcome, DualPane, PaneId};
}

pub use controller::dual_pane::DualPane;
pub use fs::privilege::has_elevated_privileges;
pub use model::pane::PaneNavigator;
pub use operators::link_creator::{LinkCreator, LinkResult, create_link};
