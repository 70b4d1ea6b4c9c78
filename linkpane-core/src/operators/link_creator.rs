//! src/operators/link_creator.rs
//! ============================================================================
//! # `LinkCreator`: validate, create and classify
//!
//! Drop handler -> `DualPane::handle_drop` -> `LinkCreator::create_link`
//!
//! Creates `target_folder/basename(source)` pointing at `source`. The
//! existence pre-check only produces a clearer message; a same-named entry
//! appearing between check and creation is still reported as
//! [`LinkErrorKind::AlreadyExists`] from the creation call itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::LinkError;
use crate::fs::paths::{self, CaseSensitivity};
use crate::fs::symlink;
use crate::model::events::{EventHook, LinkEvent, LinkStage};

#[cfg(windows)]
const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

pub type LinkResult = Result<CreatedLink, LinkError>;

/// A `(source, target folder)` pair as produced by a drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub source: PathBuf,
    pub target_folder: PathBuf,
}

impl LinkRequest {
    pub fn new(source: impl Into<PathBuf>, target_folder: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target_folder: target_folder.into(),
        }
    }

    /// Where the link would be created, if the source has a final component.
    #[must_use]
    pub fn link_path(&self) -> Option<PathBuf> {
        paths::base_name(&self.source).map(|name| self.target_folder.join(name))
    }
}

impl std::fmt::Display for LinkRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Link({} -> {})",
            self.source.display(),
            self.target_folder.display()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub link_path: PathBuf,
    pub source: PathBuf,

    /// Directory hint passed to the platform call.
    pub is_dir: bool,
}

impl CreatedLink {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "created link:\n{}\n -> {}",
            self.link_path.display(),
            self.source.display()
        )
    }
}

/// `(success, message)` pair for the presentation layer.
#[must_use]
pub fn into_status(result: &LinkResult) -> (bool, String) {
    match result {
        Ok(created) => (true, created.message()),
        Err(err) => (false, err.message.to_string()),
    }
}

/// Stateless apart from the optional observer, so one instance can serve
/// both panes.
#[derive(Clone, Default)]
pub struct LinkCreator {
    hook: Option<EventHook>,
}

impl std::fmt::Debug for LinkCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkCreator")
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Everything validation learned, ready for the creation call.
struct Prepared<'a> {
    source: &'a Path,
    target_folder: &'a Path,
    base_name: String,
    link_path: PathBuf,
    is_dir: bool,
}

impl LinkCreator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hook(mut self, hook: EventHook) -> Self {
        self.hook = Some(hook);
        self
    }

    #[instrument(
        name = "create_link",
        level = "debug",
        skip_all,
        fields(
            operation_id = tracing::field::Empty,
            source = %source.as_ref().display(),
            target = %target_folder.as_ref().display(),
        )
    )]
    pub fn create_link(
        &self,
        source: impl AsRef<Path>,
        target_folder: impl AsRef<Path>,
    ) -> LinkResult {
        let source = source.as_ref();
        let target_folder = target_folder.as_ref();

        let operation_id = nanoid::nanoid!();
        tracing::Span::current().record("operation_id", tracing::field::display(&operation_id));

        let requested =
            LinkEvent::requested(&operation_id, source.to_path_buf(), target_folder.to_path_buf());
        self.emit(&requested);

        let prepared = match validate(source, target_folder) {
            Ok(prepared) => prepared,
            Err(err) => return Err(self.fail(requested, LinkStage::Rejected, err)),
        };

        match prepared.create() {
            Ok(created) => {
                info!(
                    marker = "LINK_CREATED",
                    operation_type = "create_link",
                    link = %created.link_path.display(),
                    is_dir = created.is_dir,
                    "Symbolic link created"
                );
                self.emit(&requested.created(created.link_path.clone(), created.message()));
                Ok(created)
            }
            Err(err) => Err(self.fail(requested, LinkStage::Failed, err)),
        }
    }

    fn fail(&self, requested: LinkEvent, stage: LinkStage, err: LinkError) -> LinkError {
        let err = err.trace();
        self.emit(&requested.errored(stage, &err));
        err
    }

    fn emit(&self, event: &LinkEvent) {
        if let Some(hook) = &self.hook {
            hook(event);
        }
    }
}

/// Create a link with a hook-less creator.
pub fn create_link(source: impl AsRef<Path>, target_folder: impl AsRef<Path>) -> LinkResult {
    LinkCreator::new().create_link(source, target_folder)
}

fn validate<'a>(source: &'a Path, target_folder: &'a Path) -> Result<Prepared<'a>, LinkError> {
    // symlink_metadata: a dangling link is still an existing entry.
    if fs::symlink_metadata(source).is_err() {
        return Err(LinkError::source_not_found(source, target_folder));
    }

    if !target_folder.is_dir() {
        return Err(LinkError::invalid_target(source, target_folder));
    }

    let Some(base_name) = paths::base_name(source) else {
        return Err(LinkError::unknown(
            source,
            target_folder,
            format_args!("source path has no final component: {}", source.display()),
        ));
    };

    let is_dir = source.is_dir();

    if is_dir && links_into_itself(source, target_folder) {
        return Err(LinkError::cyclic(source, target_folder));
    }

    let link_path = target_folder.join(&base_name);
    if fs::symlink_metadata(&link_path).is_ok() {
        return Err(LinkError::already_exists(source, target_folder, &base_name));
    }

    debug!(
        marker = "LINK_VALIDATED",
        operation_type = "create_link",
        link = %link_path.display(),
        is_dir
    );

    Ok(Prepared {
        source,
        target_folder,
        base_name,
        link_path,
        is_dir,
    })
}

fn resolved(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| paths::normalize(path))
}

/// Target equal to or beneath the source directory would make the new link
/// reachable from its own target.
fn links_into_itself(source: &Path, target_folder: &Path) -> bool {
    paths::is_within(
        &resolved(target_folder),
        &resolved(source),
        CaseSensitivity::Auto,
    )
}

impl Prepared<'_> {
    fn create(self) -> Result<CreatedLink, LinkError> {
        symlink::create(self.source, &self.link_path, self.is_dir)
            .map_err(|err| classify(&err, self.source, self.target_folder, &self.base_name))?;

        Ok(CreatedLink {
            link_path: self.link_path,
            source: self.source.to_path_buf(),
            is_dir: self.is_dir,
        })
    }
}

fn classify(err: &io::Error, source: &Path, target_folder: &Path, base_name: &str) -> LinkError {
    if err.kind() == io::ErrorKind::AlreadyExists {
        return LinkError::already_exists(source, target_folder, base_name);
    }

    if is_privilege_error(err) {
        return LinkError::permission_denied(source, target_folder, err.raw_os_error());
    }

    if err.raw_os_error().is_some() {
        LinkError::os_failure(source, target_folder, err)
    } else {
        LinkError::unknown(source, target_folder, err)
    }
}

#[cfg(windows)]
fn is_privilege_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ERROR_PRIVILEGE_NOT_HELD)
}

/// `EACCES` is an unwritable target folder, not a missing privilege; it
/// stays a [`LinkErrorKind::OsFailure`].
#[cfg(unix)]
fn is_privilege_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(any(unix, windows)))]
fn is_privilege_error(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkErrorKind;
    use crate::fs::symlink::{LinkKind, link_kind};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        source_file: PathBuf,
        source_dir: PathBuf,
        target: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let target = dir.path().join("backup");
        fs::create_dir_all(data.join("photos")).unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::write(data.join("report.pdf"), b"%PDF").unwrap();

        Fixture {
            source_file: data.join("report.pdf"),
            source_dir: data.join("photos"),
            target,
            _dir: dir,
        }
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn missing_source_is_rejected_without_mutation() {
        let fx = fixture();
        let missing = fx.target.parent().unwrap().join("nope.txt");

        let err = create_link(&missing, &fx.target).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::SourceNotFound);
        assert_eq!(entries(&fx.target), 0);

        let err = create_link("", &fx.target).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::SourceNotFound);
    }

    #[test]
    fn non_directory_target_is_invalid() {
        let fx = fixture();

        let err = create_link(&fx.source_dir, &fx.source_file).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::InvalidTarget);

        let err = create_link(&fx.source_file, fx.target.join("missing")).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::InvalidTarget);

        let err = create_link(&fx.source_file, "").unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::InvalidTarget);
    }

    #[cfg(unix)]
    #[test]
    fn creates_link_then_reports_existing_name() {
        let fx = fixture();

        let created = create_link(&fx.source_file, &fx.target).unwrap();
        assert_eq!(created.link_path, fx.target.join("report.pdf"));
        assert!(!created.is_dir);
        assert_eq!(fs::read_link(&created.link_path).unwrap(), fx.source_file);
        assert_eq!(entries(&fx.target), 1);

        let err = create_link(&fx.source_file, &fx.target).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::AlreadyExists);
        assert_eq!(
            err.message,
            "an entry named 'report.pdf' already exists at the target location"
        );
        assert_eq!(fs::read_link(&created.link_path).unwrap(), fx.source_file);
        assert_eq!(entries(&fx.target), 1);
    }

    #[cfg(unix)]
    #[test]
    fn directory_hint_shapes_the_link() {
        let fx = fixture();

        let dir_link = create_link(&fx.source_dir, &fx.target).unwrap();
        let file_link = create_link(&fx.source_file, &fx.target).unwrap();

        assert!(dir_link.is_dir);
        assert_eq!(link_kind(&dir_link.link_path), Some(LinkKind::Directory));
        assert_eq!(link_kind(&file_link.link_path), Some(LinkKind::File));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_counts_as_existing_source() {
        let fx = fixture();
        let dangling = fx.source_dir.join("dangling");
        std::os::unix::fs::symlink(fx.source_dir.join("gone"), &dangling).unwrap();

        let created = create_link(&dangling, &fx.target).unwrap();
        assert_eq!(created.link_path, fx.target.join("dangling"));
    }

    #[test]
    fn linking_a_directory_into_itself_is_refused() {
        let fx = fixture();
        let nested = fx.source_dir.join("2024");
        fs::create_dir(&nested).unwrap();

        let err = create_link(&fx.source_dir, &fx.source_dir).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::CyclicLink);

        let err = create_link(&fx.source_dir, &nested).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::CyclicLink);
        assert_eq!(entries(&nested), 0);
    }

    #[test]
    fn file_into_own_parent_collides_with_itself() {
        let fx = fixture();
        let parent = fx.source_file.parent().unwrap();

        let err = create_link(&fx.source_file, parent).unwrap_err();
        assert_eq!(err.kind, LinkErrorKind::AlreadyExists);
    }

    #[cfg(unix)]
    #[test]
    fn read_only_target_is_an_os_failure() {
        use std::os::unix::fs::PermissionsExt;

        if crate::fs::privilege::has_elevated_privileges() {
            return; // root ignores directory permissions
        }

        let fx = fixture();
        fs::set_permissions(&fx.target, fs::Permissions::from_mode(0o555)).unwrap();

        let err = create_link(&fx.source_file, &fx.target).unwrap_err();
        fs::set_permissions(&fx.target, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(err.kind, LinkErrorKind::OsFailure);
        assert_eq!(err.os_code, Some(libc::EACCES));
        assert!(!err.message.contains("elevated privileges"));
    }

    #[cfg(unix)]
    #[test]
    fn classification_by_os_code() {
        let src = Path::new("/s");
        let dst = Path::new("/t");

        let kind = |err: io::Error| classify(&err, src, dst, "s").kind;

        assert_eq!(kind(io::Error::from_raw_os_error(libc::EEXIST)), LinkErrorKind::AlreadyExists);
        assert_eq!(kind(io::Error::from_raw_os_error(libc::EPERM)), LinkErrorKind::PermissionDenied);
        assert_eq!(kind(io::Error::from_raw_os_error(libc::EACCES)), LinkErrorKind::OsFailure);
        assert_eq!(kind(io::Error::from_raw_os_error(libc::ENOSPC)), LinkErrorKind::OsFailure);
        assert_eq!(kind(io::Error::other("boom")), LinkErrorKind::Unknown);
    }

    #[cfg(unix)]
    #[test]
    fn hook_sees_request_and_outcome_with_shared_id() {
        let fx = fixture();
        let seen: Arc<Mutex<Vec<LinkEvent>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let creator = LinkCreator::new().with_hook(Arc::new(move |event: &LinkEvent| {
            sink.lock().unwrap().push(event.clone());
        }));

        creator.create_link(&fx.source_file, &fx.target).unwrap();
        creator.create_link(&fx.source_file, &fx.target).unwrap_err();

        let events = seen.lock().unwrap();
        let stages: Vec<LinkStage> = events.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![
                LinkStage::Requested,
                LinkStage::Created,
                LinkStage::Requested,
                LinkStage::Rejected
            ]
        );
        assert_eq!(events[0].id, events[1].id);
        assert_ne!(events[1].id, events[2].id);
        assert_eq!(events[1].link_path, Some(fx.target.join("report.pdf")));
        assert_eq!(events[3].error_kind, Some(LinkErrorKind::AlreadyExists));
    }

    #[cfg(unix)]
    #[test]
    fn status_pair_for_presentation() {
        let fx = fixture();

        let (ok, message) = into_status(&create_link(&fx.source_file, &fx.target));
        assert!(ok);
        assert!(message.starts_with("created link:\n"));
        assert!(message.ends_with(&format!(" -> {}", fx.source_file.display())));

        let (ok, message) = into_status(&create_link(&fx.source_file, &fx.target));
        assert!(!ok);
        assert!(message.contains("already exists"));
    }

    #[test]
    fn request_link_path_uses_base_name() {
        let request = LinkRequest::new("/data/report.pdf", "/backup");
        assert_eq!(request.link_path(), Some(PathBuf::from("/backup/report.pdf")));
        assert_eq!(LinkRequest::new("/", "/backup").link_path(), None);
    }
}
