//! Does this process hold what the platform needs for unrestricted symlinks?
//!
//! # Limitations
//! Windows treats symlink creation as a privileged action unless Developer
//! Mode is on, and there is no single flag that answers the question, so the
//! check there creates a throwaway link in a temporary directory. On Unix the
//! answer is "running as root". Anything else reports `false`.

use tracing::debug;

/// `false` whenever the answer cannot be determined.
#[must_use]
pub fn has_elevated_privileges() -> bool {
    let elevated = platform::has_elevated_privileges();
    debug!(
        marker = "PRIVILEGE_CHECK",
        operation_type = "privilege",
        elevated,
        "Queried symlink privileges"
    );
    elevated
}

#[cfg(unix)]
mod platform {
    pub(super) fn has_elevated_privileges() -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
}

#[cfg(windows)]
mod platform {
    pub(super) fn has_elevated_privileges() -> bool {
        let Ok(dir) = tempfile::tempdir() else {
            return false;
        };

        let original = dir.path().join("probe-target");
        let link = dir.path().join("probe-link");

        std::os::windows::fs::symlink_file(&original, &link).is_ok()
    }
}

#[cfg(not(any(unix, windows)))]
mod platform {
    pub(super) fn has_elevated_privileges() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn matches_effective_uid() {
        let euid = unsafe { libc::geteuid() };
        assert_eq!(has_elevated_privileges(), euid == 0);
    }

    #[test]
    fn is_stable_across_calls() {
        assert_eq!(has_elevated_privileges(), has_elevated_privileges());
    }
}
