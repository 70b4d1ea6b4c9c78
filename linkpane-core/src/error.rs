//! src/error.rs
//! ============================================================================
//! # Error taxonomy
//!
//! `LinkError` is the data-carrying outcome of a failed link creation. It is
//! returned to the caller, never thrown, so the presentation layer can show a
//! tailored message. `AppError` covers the ambient layers (config, logging)
//! that sit outside the link core.

use std::io;
use std::path::{Path, PathBuf};

use compact_str::{CompactString, format_compact};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;
use tracing::{error, warn};

use crate::logging::LoggingError;

/// Convenient alias for the ambient layers.
pub type AppResult<T> = Result<T, AppError>;

/// Classification of a failed link creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkErrorKind {
    SourceNotFound,
    InvalidTarget,
    AlreadyExists,
    PermissionDenied,
    OsFailure,
    /// Source directory would be linked into its own subtree.
    CyclicLink,
    Unknown,
}

impl LinkErrorKind {
    /// Whether the user can fix the situation and re-invoke.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::SourceNotFound
                | Self::InvalidTarget
                | Self::AlreadyExists
                | Self::PermissionDenied
                | Self::CyclicLink
        )
    }

    /// The core never retries on its own; every kind is terminal for one call.
    #[inline]
    #[must_use]
    pub const fn should_retry(self) -> bool {
        false
    }

    #[inline]
    #[must_use]
    pub const fn operation_type(self) -> &'static str {
        match self {
            Self::SourceNotFound | Self::InvalidTarget | Self::CyclicLink => "input_validation",

            Self::AlreadyExists => "name_collision",

            Self::PermissionDenied => "privilege",

            Self::OsFailure => "file_system",

            Self::Unknown => "unknown_error",
        }
    }

    /// Stable log key for grouping.
    #[inline]
    #[must_use]
    pub const fn error_marker(self) -> &'static str {
        match self {
            Self::SourceNotFound   => "ERROR_SOURCE_NOT_FOUND",

            Self::InvalidTarget    => "ERROR_INVALID_TARGET",

            Self::AlreadyExists    => "ERROR_ALREADY_EXISTS",

            Self::PermissionDenied => "ERROR_PERMISSION_DENIED",

            Self::OsFailure        => "ERROR_OS_FAILURE",

            Self::CyclicLink       => "ERROR_CYCLIC_LINK",

            Self::Unknown          => "ERROR_UNKNOWN",
        }
    }
}

impl std::fmt::Display for LinkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &'_ str = match self {
            Self::SourceNotFound => "source_not_found",
            Self::InvalidTarget => "invalid_target",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::OsFailure => "os_failure",
            Self::CyclicLink => "cyclic_link",
            Self::Unknown => "unknown",
        };

        write!(f, "{s}")
    }
}

/// A failed link creation: kind plus the human-readable message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LinkError {
    pub kind: LinkErrorKind,

    pub message: CompactString,

    pub source_path: PathBuf,

    pub target_folder: PathBuf,

    /// Raw OS error code of the failed creation call, if any.
    pub os_code: Option<i32>,
}

impl LinkError {
    fn new(kind: LinkErrorKind, message: CompactString, source: &Path, target: &Path) -> Self {
        Self {
            kind,
            message,
            source_path: source.to_path_buf(),
            target_folder: target.to_path_buf(),
            os_code: None,
        }
    }

    #[must_use]
    pub fn source_not_found(source: &Path, target: &Path) -> Self {
        Self::new(
            LinkErrorKind::SourceNotFound,
            format_compact!("source path does not exist: {}", source.display()),
            source,
            target,
        )
    }

    #[must_use]
    pub fn invalid_target(source: &Path, target: &Path) -> Self {
        Self::new(
            LinkErrorKind::InvalidTarget,
            format_compact!("target is not a valid directory: {}", target.display()),
            source,
            target,
        )
    }

    #[must_use]
    pub fn already_exists(source: &Path, target: &Path, base_name: &str) -> Self {
        Self::new(
            LinkErrorKind::AlreadyExists,
            format_compact!("an entry named '{base_name}' already exists at the target location"),
            source,
            target,
        )
    }

    #[must_use]
    pub fn permission_denied(source: &Path, target: &Path, os_code: Option<i32>) -> Self {
        let mut err = Self::new(
            LinkErrorKind::PermissionDenied,
            CompactString::const_new(
                "creating a symbolic link requires elevated privileges; re-run with administrator/root rights",
            ),
            source,
            target,
        );
        err.os_code = os_code;
        err
    }

    #[must_use]
    pub fn os_failure(source: &Path, target: &Path, io_err: &io::Error) -> Self {
        let mut err = Self::new(
            LinkErrorKind::OsFailure,
            format_compact!("operating system error while creating the link: {io_err}"),
            source,
            target,
        );
        err.os_code = io_err.raw_os_error();
        err
    }

    #[must_use]
    pub fn cyclic(source: &Path, target: &Path) -> Self {
        Self::new(
            LinkErrorKind::CyclicLink,
            format_compact!(
                "refusing to link '{}' into itself or one of its subdirectories: {}",
                source.display(),
                target.display()
            ),
            source,
            target,
        )
    }

    #[must_use]
    pub fn unknown(source: &Path, target: &Path, details: impl std::fmt::Display) -> Self {
        Self::new(
            LinkErrorKind::Unknown,
            format_compact!("{details}"),
            source,
            target,
        )
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> LinkErrorKind {
        self.kind
    }

    /// Structured fields for log grouping (stack-allocated up to four).
    #[must_use]
    pub fn extract_trace_fields(&self) -> SmallVec<[(&'static str, CompactString); 4]> {
        let mut fields: SmallVec<[(&'static str, CompactString); 4]> = smallvec![
            ("source", CompactString::from(self.source_path.to_string_lossy())),
            ("target", CompactString::from(self.target_folder.to_string_lossy())),
        ];

        if let Some(code) = self.os_code {
            fields.push(("os_code", format_compact!("{code}")));
        }

        fields
    }

    /// Emit a single `tracing` event for this error and hand it back.
    #[must_use]
    pub fn trace(self) -> Self {
        let extra = self.extract_trace_fields();

        if self.kind.is_recoverable() {
            warn!(
                marker = self.kind.error_marker(),
                operation_type = self.kind.operation_type(),
                error = %self,
                recoverable = true,
                retry = self.kind.should_retry(),
                extra = ?extra,
            );
        } else {
            error!(
                marker = self.kind.error_marker(),
                operation_type = self.kind.operation_type(),
                error = %self,
                recoverable = false,
                retry = self.kind.should_retry(),
                extra = ?extra,
            );
        }

        self
    }
}

/// Errors of the configuration and logging layers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// No home directory could be determined for the platform config dir.
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

impl AppError {
    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}
