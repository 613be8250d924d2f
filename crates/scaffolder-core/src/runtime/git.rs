//! Best-effort repository initialization

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Initializes version control in a new project
pub trait VersionControl: Send + Sync {
    /// True when a repository with an initial commit was created.
    /// Failures are reported as `false`, never as errors.
    fn try_git_init(&self, root: &Path) -> bool;
}

/// Drives the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    commit_message: String,
}

impl GitCli {
    pub fn new(commit_message: impl Into<String>) -> Self {
        Self {
            commit_message: commit_message.into(),
        }
    }

    fn git(root: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn is_available(root: &Path) -> bool {
        Self::git(root, &["--version"])
    }

    fn is_inside_work_tree(root: &Path) -> bool {
        Self::git(root, &["rev-parse", "--is-inside-work-tree"])
    }

    fn is_inside_mercurial(root: &Path) -> bool {
        Command::new("hg")
            .args(["--cwd", ".", "root"])
            .current_dir(root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }
}

impl VersionControl for GitCli {
    fn try_git_init(&self, root: &Path) -> bool {
        if !Self::is_available(root) {
            debug!("git not found, skipping repository init");
            return false;
        }
        if Self::is_inside_work_tree(root) || Self::is_inside_mercurial(root) {
            debug!("already inside a repository, skipping init");
            return false;
        }
        if !Self::git(root, &["init"]) {
            return false;
        }

        let committed = Self::git(root, &["add", "-A"])
            && Self::git(root, &["commit", "-m", &self.commit_message]);
        if committed {
            return true;
        }

        // Leave no half-initialized repository behind
        let git_dir = root.join(".git");
        if let Err(e) = std::fs::remove_dir_all(&git_dir) {
            warn!(path = %git_dir.display(), error = %e, "could not remove .git");
        }
        false
    }
}
